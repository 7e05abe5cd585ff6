//! Golden grant vectors.
//!
//! Known commands with the exact message and permission they must produce.
//! Administrative clients match on these messages, so they must not drift.

use marketops_perms::AccessControl;

/// A golden grant vector.
#[derive(Debug, Clone)]
pub struct GrantVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// The command as typed.
    pub command: &'static str,
    /// Message returned by `execute_grant`.
    pub expected_message: &'static str,
    /// `(user, permission)` stored on success.
    pub expected_grant: Option<(&'static str, &'static str)>,
}

const INVALID_SYNTAX: &str = "ERROR: Invalid syntax. Use 'GRANT READ ON ALL TO username'";
const NOT_A_GRANT: &str = "ERROR: Parsing failure. Expected a GRANT command.";

/// Get all golden grant vectors.
pub fn all_vectors() -> Vec<GrantVector> {
    vec![
        GrantVector {
            name: "read on all",
            command: "GRANT READ ON ALL TO alice",
            expected_message: "SUCCESS: Granted READ on ALL to alice",
            expected_grant: Some(("alice", "READ:ALL")),
        },
        GrantVector {
            name: "lower-case keywords and mixed-case user",
            command: "grant write on gold to Bob",
            expected_message: "SUCCESS: Granted WRITE on GOLD to bob",
            expected_grant: Some(("bob", "WRITE:GOLD")),
        },
        GrantVector {
            name: "collection target with extra whitespace",
            command: "  GRANT\tADMIN   ON market-assets TO trader  ",
            expected_message: "SUCCESS: Granted ADMIN on MARKET-ASSETS to trader",
            expected_grant: Some(("trader", "ADMIN:MARKET-ASSETS")),
        },
        GrantVector {
            name: "empty command",
            command: "",
            expected_message: NOT_A_GRANT,
            expected_grant: None,
        },
        GrantVector {
            name: "other verb",
            command: "REVOKE READ ON ALL TO alice",
            expected_message: NOT_A_GRANT,
            expected_grant: None,
        },
        GrantVector {
            name: "verb without separator",
            command: "GRANTREAD ON ALL TO alice",
            expected_message: NOT_A_GRANT,
            expected_grant: None,
        },
        GrantVector {
            name: "missing user",
            command: "GRANT READ ON ALL TO",
            expected_message: INVALID_SYNTAX,
            expected_grant: None,
        },
        GrantVector {
            name: "swapped keywords",
            command: "GRANT READ TO alice ON ALL",
            expected_message: INVALID_SYNTAX,
            expected_grant: None,
        },
        GrantVector {
            name: "trailing token",
            command: "GRANT READ ON ALL TO alice now",
            expected_message: INVALID_SYNTAX,
            expected_grant: None,
        },
        GrantVector {
            name: "separator inside action",
            command: "GRANT READ:ALL ON ALL TO alice",
            expected_message: INVALID_SYNTAX,
            expected_grant: None,
        },
    ]
}

/// Run every vector against a fresh engine.
///
/// Returns `(name, matches, actual message)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    all_vectors()
        .iter()
        .map(|v| {
            let engine = AccessControl::new();
            let message = engine.execute_grant(v.command);

            let stored_ok = match v.expected_grant {
                Some((user, permission)) => {
                    engine.permissions(user).into_iter().eq([permission.to_string()])
                }
                None => engine.usernames().is_empty(),
            };

            (
                v.name.to_string(),
                stored_ok && message == v.expected_message,
                message,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_match() {
        for (name, matches, message) in verify_all_vectors() {
            assert!(matches, "vector '{name}' produced {message:?}");
        }
    }

    #[test]
    fn test_vector_names_are_unique() {
        let vectors = all_vectors();
        let mut names: Vec<_> = vectors.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), vectors.len());
    }
}
