//! Proptest generators for property-based testing.

use proptest::prelude::*;

use marketops_perms::{GrantCommand, ADMIN};

/// Randomly flip the case of each character of generated words.
pub fn mixed_case<S>(words: S) -> impl Strategy<Value = String>
where
    S: Strategy<Value = String>,
{
    words.prop_flat_map(|word| {
        let len = word.chars().count();
        prop::collection::vec(any::<bool>(), len).prop_map(move |flips| {
            word.chars()
                .zip(flips)
                .map(|(c, upper)| {
                    if upper {
                        c.to_ascii_uppercase()
                    } else {
                        c.to_ascii_lowercase()
                    }
                })
                .collect()
        })
    })
}

/// Generate a user name in arbitrary case.
pub fn username() -> impl Strategy<Value = String> {
    mixed_case("[a-z][a-z0-9_]{0,15}".prop_map(String::from))
}

/// Generate an action, `ADMIN` included, in arbitrary case.
pub fn action() -> impl Strategy<Value = String> {
    mixed_case(prop_oneof![4 => plain_action(), 1 => Just(ADMIN.to_lowercase())])
}

/// Generate an action other than `ADMIN`, lower-case.
pub fn plain_action() -> impl Strategy<Value = String> {
    let known = prop_oneof![
        Just("read".to_string()),
        Just("write".to_string()),
        Just("delete".to_string()),
        Just("export".to_string()),
    ];
    let free = "[a-z][a-z_]{0,9}".prop_map(String::from);

    prop_oneof![3 => known, 1 => free]
        .prop_filter("not admin", |a| !a.eq_ignore_ascii_case(ADMIN))
}

/// Generate a grant target: `ALL`, a collection or an object id.
pub fn target() -> impl Strategy<Value = String> {
    let named = prop_oneof![
        Just("all".to_string()),
        Just("market-assets".to_string()),
        Just("models".to_string()),
    ];
    let object = "[a-z0-9][a-z0-9_.-]{0,15}".prop_map(String::from);

    mixed_case(prop_oneof![1 => named, 3 => object])
}

/// Generate whitespace between grant tokens.
pub fn separator() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => Just(" ".to_string()),
        1 => Just("  ".to_string()),
        1 => Just("\t".to_string()),
        1 => Just(" \t ".to_string()),
    ]
}

/// Generate arbitrary text, mostly not a grant command.
pub fn command_text() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => "\\PC{0,64}".prop_map(String::from),
        1 => mixed_case("grant( [a-z:]{1,6}){0,7}".prop_map(String::from)),
    ]
}

/// Parameters for a well-formed grant command.
#[derive(Debug, Clone)]
pub struct GrantParams {
    pub action: String,
    pub target: String,
    pub username: String,
    pub keywords: [String; 3],
    pub separators: [String; 5],
}

impl GrantParams {
    /// Render the command text.
    pub fn text(&self) -> String {
        let [grant, on, to] = &self.keywords;
        let [s1, s2, s3, s4, s5] = &self.separators;
        format!(
            "{grant}{s1}{}{s2}{on}{s3}{}{s4}{to}{s5}{}",
            self.action, self.target, self.username
        )
    }

    /// The command the engine should parse from [`text`](Self::text).
    pub fn expected(&self) -> GrantCommand {
        GrantCommand::new(&self.action, &self.target, &self.username)
    }
}

impl Arbitrary for GrantParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            action(),
            target(),
            username(),
            [
                mixed_case(Just("grant".to_string())),
                mixed_case(Just("on".to_string())),
                mixed_case(Just("to".to_string())),
            ],
            [separator(), separator(), separator(), separator(), separator()],
        )
            .prop_map(|(action, target, username, keywords, separators)| GrantParams {
                action,
                target,
                username,
                keywords,
                separators,
            })
            .boxed()
    }
}
