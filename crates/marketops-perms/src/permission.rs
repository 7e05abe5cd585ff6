//! Permission strings.
//!
//! A permission is `ACTION:TARGET`, both upper-case. The target `ALL`
//! matches every object for its action. `ADMIN:ALL` is the superuser grant
//! and authorizes every action on every object.

use std::fmt;

/// Separator between action and target.
pub const SEPARATOR: char = ':';

/// Wildcard target matching any object.
pub const WILDCARD: &str = "ALL";

/// Administrative action. Held on `ALL`, it authorizes everything.
pub const ADMIN: &str = "ADMIN";

/// Canonical form of an action or target: upper-case, trimmed.
pub fn canonical_token(token: &str) -> String {
    token.trim().to_uppercase()
}

/// Canonical form of a user name: lower-case, trimmed.
pub fn canonical_user(name: &str) -> String {
    name.trim().to_lowercase()
}

/// An `ACTION:TARGET` pair in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Permission {
    action: String,
    target: String,
}

impl Permission {
    /// Create a permission, canonicalizing both halves.
    pub fn new(action: &str, target: &str) -> Self {
        Self {
            action: canonical_token(action),
            target: canonical_token(target),
        }
    }

    /// `ADMIN:ALL`, the bootstrap grant for administrators.
    pub fn admin_all() -> Self {
        Self::new(ADMIN, WILDCARD)
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Whether the target is the `ALL` wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.target == WILDCARD
    }

    /// Every stored permission that would authorize `action` on `object`.
    ///
    /// Order: exact, wildcard target, `ADMIN:ALL`. An admin grant on a
    /// single target is only an ordinary `ADMIN` action there.
    pub fn candidates(action: &str, object: &str) -> [String; 3] {
        let action = canonical_token(action);
        let object = canonical_token(object);
        [
            format!("{action}{SEPARATOR}{object}"),
            format!("{action}{SEPARATOR}{WILDCARD}"),
            format!("{ADMIN}{SEPARATOR}{WILDCARD}"),
        ]
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.action, SEPARATOR, self.target)
    }
}

impl From<Permission> for String {
    fn from(permission: Permission) -> Self {
        permission.to_string()
    }
}
