//! Error types for the permissions module.

use thiserror::Error;

/// Errors that can occur while parsing grant commands.
///
/// These never escape [`AccessControl::execute_grant`](crate::AccessControl::execute_grant);
/// they are rendered into the returned message instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermsError {
    /// The command does not start with the `GRANT` keyword.
    #[error("not a grant command: {0:?}")]
    NotAGrant(String),

    /// The command starts with `GRANT` but does not match
    /// `GRANT <ACTION> ON <TARGET> TO <USER>`.
    #[error("invalid grant syntax: {0:?}")]
    InvalidSyntax(String),
}

/// Result type for permission operations.
pub type Result<T> = std::result::Result<T, PermsError>;
