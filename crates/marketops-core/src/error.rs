//! Error types for the catalog core.

use thiserror::Error;

/// Errors that can occur while handling catalog records.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Collection path or storage tag did not name an entity kind.
    #[error("unknown entity kind: {0}")]
    UnknownKind(String),

    /// A record body could not be decoded.
    #[error("malformed record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
