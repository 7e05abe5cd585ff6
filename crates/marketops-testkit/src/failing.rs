//! A store that fails on demand, for exercising persistence error paths.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use marketops_core::{EntityKind, Record};
use marketops_store::{InsertResult, MemoryStore, Result, Store, StoreError, StoredUser};

/// Wraps a [`MemoryStore`] and fails reads and/or writes while the
/// corresponding switch is on.
#[derive(Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FailingStore {
    /// A store whose writes always fail. Reads succeed (and see nothing).
    pub fn failing_writes() -> Self {
        let store = Self::default();
        store.set_fail_writes(true);
        store
    }

    /// A store whose reads always fail.
    pub fn failing_reads() -> Self {
        let store = Self::default();
        store.set_fail_reads(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The wrapped store, bypassing failure injection.
    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FailingStore {
    async fn ensure_user(&self, username: &str) -> Result<()> {
        self.check_write()?;
        self.inner.ensure_user(username).await
    }

    async fn insert_permission(&self, username: &str, permission: &str) -> Result<InsertResult> {
        self.check_write()?;
        self.inner.insert_permission(username, permission).await
    }

    async fn load_users(&self) -> Result<Vec<StoredUser>> {
        self.check_read()?;
        self.inner.load_users().await
    }

    async fn upsert_record(&self, record: &Record) -> Result<()> {
        self.check_write()?;
        self.inner.upsert_record(record).await
    }

    async fn list_records(&self, kind: Option<EntityKind>) -> Result<Vec<Record>> {
        self.check_read()?;
        self.inner.list_records(kind).await
    }
}
