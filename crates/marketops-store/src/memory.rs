//! Volatile [`Store`] with the same merge and upsert rules as SQLite.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use marketops_core::{EntityKind, Record};

use crate::error::Result;
use crate::traits::{record_key, InsertResult, Store, StoredUser};

/// Catalog store held in process memory. Dropped with its owner.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Users and their permissions.
    users: BTreeMap<String, BTreeSet<String>>,

    /// Records indexed by (kind, lower-cased id).
    records: HashMap<(EntityKind, String), Record>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ensure_user(&self, username: &str) -> Result<()> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.users.entry(username.to_string()).or_default();
        Ok(())
    }

    async fn insert_permission(&self, username: &str, permission: &str) -> Result<InsertResult> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let inserted = inner
            .users
            .entry(username.to_string())
            .or_default()
            .insert(permission.to_string());

        Ok(if inserted {
            InsertResult::Inserted
        } else {
            InsertResult::AlreadyExists
        })
    }

    async fn load_users(&self) -> Result<Vec<StoredUser>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .users
            .iter()
            .map(|(username, permissions)| StoredUser {
                username: username.clone(),
                permissions: permissions.clone(),
            })
            .collect())
    }

    async fn upsert_record(&self, record: &Record) -> Result<()> {
        let key = record_key(record)?;
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner.records.insert(key, record.clone());
        Ok(())
    }

    async fn list_records(&self, kind: Option<EntityKind>) -> Result<Vec<Record>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Ok(inner
            .records
            .iter()
            .filter(|((k, _), _)| kind.map_or(true, |kind| *k == kind))
            .map(|(_, record)| record.clone())
            .collect())
    }
}
