//! Error types for the catalog.

use std::collections::BTreeSet;

use marketops_core::CoreError;
use marketops_store::StoreError;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The caller lacks the permission for a write.
    ///
    /// Carries the caller's current permissions so the denial can be
    /// diagnosed from the response alone.
    #[error(
        "access denied for user: {}. permissions: {:?}",
        .user.as_deref().unwrap_or("No Header"),
        .permissions
    )]
    AccessDenied {
        user: Option<String>,
        permissions: BTreeSet<String>,
    },

    /// Bad collection name or record body.
    #[error("invalid record: {0}")]
    Core(#[from] CoreError),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
