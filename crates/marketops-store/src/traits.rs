//! The persistence seam between the catalog and its backends.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use marketops_core::{EntityKind, Record};

use crate::error::Result;

/// Result of inserting a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertResult {
    /// Permission was inserted.
    Inserted,
    /// Permission already exists (idempotent - not an error).
    AlreadyExists,
}

/// A persisted user and their permissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Canonical (lower-case) user name.
    pub username: String,
    /// Canonical permission strings.
    pub permissions: BTreeSet<String>,
}

/// The Store trait: async interface for catalog persistence.
///
/// Callers pass canonical user names and permissions; stores do not
/// re-canonicalize. Records are keyed by kind and lower-cased id.
///
/// # Design Notes
///
/// - **Merge, not overwrite**: `insert_permission` adds one row; concurrent
///   inserts for the same user both land.
/// - **Upsert records**: storing a record with an existing (kind, id)
///   replaces the previous body.
#[async_trait]
pub trait Store: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Make sure a user row exists.
    async fn ensure_user(&self, username: &str) -> Result<()>;

    /// Add one permission to a user, creating the user if needed.
    async fn insert_permission(&self, username: &str, permission: &str) -> Result<InsertResult>;

    /// Load every user with their permissions.
    async fn load_users(&self) -> Result<Vec<StoredUser>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Record Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert or replace a record. The record must carry an id.
    async fn upsert_record(&self, record: &Record) -> Result<()>;

    /// List stored records, optionally of a single kind.
    async fn list_records(&self, kind: Option<EntityKind>) -> Result<Vec<Record>>;
}

#[async_trait]
impl<S: Store + ?Sized> Store for Arc<S> {
    async fn ensure_user(&self, username: &str) -> Result<()> {
        (**self).ensure_user(username).await
    }

    async fn insert_permission(&self, username: &str, permission: &str) -> Result<InsertResult> {
        (**self).insert_permission(username, permission).await
    }

    async fn load_users(&self) -> Result<Vec<StoredUser>> {
        (**self).load_users().await
    }

    async fn upsert_record(&self, record: &Record) -> Result<()> {
        (**self).upsert_record(record).await
    }

    async fn list_records(&self, kind: Option<EntityKind>) -> Result<Vec<Record>> {
        (**self).list_records(kind).await
    }
}

/// Storage key for a record: `(kind, lower-cased id)`.
pub(crate) fn record_key(record: &Record) -> Result<(EntityKind, String)> {
    let id = record
        .id()
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            crate::error::StoreError::InvalidData(format!(
                "{} record has no id",
                record.kind()
            ))
        })?;
    Ok((record.kind(), id.to_lowercase()))
}
