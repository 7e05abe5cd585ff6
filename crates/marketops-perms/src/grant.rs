//! Grant commands.
//!
//! Administrators grant permissions with a one-line command:
//!
//! ```text
//! GRANT <ACTION> ON <TARGET> TO <USER>
//! ```
//!
//! Keywords are case-insensitive and tokens are separated by runs of
//! whitespace. The action and target are stored upper-case, the user
//! lower-case. Exactly six tokens are accepted.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PermsError, Result};
use crate::permission::{canonical_token, canonical_user, Permission};

static GRANT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*GRANT\s+(?P<action>[^\s:]+)\s+ON\s+(?P<target>\S+)\s+TO\s+(?P<user>\S+)\s*$",
    )
    .expect("grant grammar is a valid regex")
});

/// A parsed grant command in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantCommand {
    /// Upper-case action, e.g. `READ`.
    pub action: String,
    /// Upper-case target, e.g. `ALL` or an object id.
    pub target: String,
    /// Lower-case user name.
    pub username: String,
}

impl GrantCommand {
    /// Build a command from its parts, canonicalizing each.
    pub fn new(action: &str, target: &str, username: &str) -> Self {
        Self {
            action: canonical_token(action),
            target: canonical_token(target),
            username: canonical_user(username),
        }
    }

    /// Parse `GRANT <ACTION> ON <TARGET> TO <USER>`.
    pub fn parse(command: &str) -> Result<Self> {
        let starts_with_grant = command
            .split_whitespace()
            .next()
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case("GRANT"));
        if !starts_with_grant {
            return Err(PermsError::NotAGrant(command.to_string()));
        }

        let captures = GRANT_RE
            .captures(command)
            .ok_or_else(|| PermsError::InvalidSyntax(command.to_string()))?;

        Ok(Self::new(
            &captures["action"],
            &captures["target"],
            &captures["user"],
        ))
    }

    /// The permission this command grants.
    pub fn permission(&self) -> Permission {
        Permission::new(&self.action, &self.target)
    }
}

impl FromStr for GrantCommand {
    type Err = PermsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for GrantCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GRANT {} ON {} TO {}",
            self.action, self.target, self.username
        )
    }
}

/// Result of executing a grant command.
///
/// `Display` renders the message returned to administrative callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The permission was added (or was already present).
    Granted(GrantCommand),
    /// The command was malformed; nothing changed.
    Rejected(PermsError),
}

impl GrantOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, GrantOutcome::Granted(_))
    }

    /// The applied command, if the grant succeeded.
    pub fn command(&self) -> Option<&GrantCommand> {
        match self {
            GrantOutcome::Granted(command) => Some(command),
            GrantOutcome::Rejected(_) => None,
        }
    }
}

impl fmt::Display for GrantOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantOutcome::Granted(command) => write!(
                f,
                "SUCCESS: Granted {} on {} to {}",
                command.action, command.target, command.username
            ),
            GrantOutcome::Rejected(PermsError::NotAGrant(_)) => {
                f.write_str("ERROR: Parsing failure. Expected a GRANT command.")
            }
            GrantOutcome::Rejected(PermsError::InvalidSyntax(_)) => {
                f.write_str("ERROR: Invalid syntax. Use 'GRANT READ ON ALL TO username'")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        let command = GrantCommand::parse("grant read on Gold to ALICE").unwrap();
        assert_eq!(command.action, "READ");
        assert_eq!(command.target, "GOLD");
        assert_eq!(command.username, "alice");
        assert_eq!(command.permission().to_string(), "READ:GOLD");
    }

    #[test]
    fn test_parse_tolerates_whitespace_runs() {
        let command = GrantCommand::parse("  GRANT\tWRITE   ON  ALL \n TO bob  ").unwrap();
        assert_eq!(command, GrantCommand::new("write", "all", "bob"));
    }

    #[test]
    fn test_parse_rejects_non_grant() {
        assert!(matches!(
            GrantCommand::parse("REVOKE READ ON ALL TO bob"),
            Err(PermsError::NotAGrant(_))
        ));
        assert!(matches!(
            GrantCommand::parse(""),
            Err(PermsError::NotAGrant(_))
        ));
        assert!(matches!(
            GrantCommand::parse("   "),
            Err(PermsError::NotAGrant(_))
        ));
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for command in [
            "GRANT",
            "GRANT READ",
            "GRANT READ ON ALL",
            "GRANT READ ON ALL TO",
            "GRANT READ TO ALL ON bob",
            "GRANT READ ON ALL FOR bob",
            "GRANT READ ON ALL TO bob extra",
            "GRANT READ ON OBJECT ALL TO USER bob",
            "GRANT READ:X ON ALL TO bob",
        ] {
            assert!(
                matches!(GrantCommand::parse(command), Err(PermsError::InvalidSyntax(_))),
                "accepted {command:?}"
            );
        }
    }

    #[test]
    fn test_outcome_messages() {
        let granted = GrantOutcome::Granted(GrantCommand::new("read", "all", "alice"));
        assert_eq!(granted.to_string(), "SUCCESS: Granted READ on ALL to alice");
        assert!(granted.is_granted());

        let not_grant = GrantOutcome::Rejected(PermsError::NotAGrant(String::new()));
        assert!(not_grant.to_string().starts_with("ERROR: Parsing failure"));

        let syntax = GrantOutcome::Rejected(PermsError::InvalidSyntax(String::new()));
        assert!(syntax.to_string().starts_with("ERROR: Invalid syntax"));
        assert!(syntax.command().is_none());
    }

    #[test]
    fn test_display_reparses() {
        let command = GrantCommand::new("admin", "models", "Quant_Team");
        assert_eq!(GrantCommand::parse(&command.to_string()).unwrap(), command);
    }
}
