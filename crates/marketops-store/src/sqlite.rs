//! rusqlite-backed [`Store`].
//!
//! One connection behind a mutex; every query runs on tokio's blocking
//! pool so callers on the async runtime never stall on disk I/O.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::debug;

use marketops_core::{now_millis, EntityKind, Record};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{record_key, InsertResult, Store, StoredUser};

/// How long a statement waits on a locked database file before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Durable catalog store in a single SQLite file.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database file at `path` and bring its schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(%mode, "opened sqlite store");
        Self::with_connection(conn)
    }

    /// A private database that disappears when the store is dropped.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a closure against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            // A poisoned lock means a closure panicked; any open transaction was rolled back.
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Record bodies are tagged CBOR.
fn encode_record(record: &Record) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    ciborium::into_writer(record, &mut buf)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    Ok(buf)
}

fn decode_record(body: &[u8]) -> Result<Record> {
    ciborium::from_reader(body).map_err(|e| StoreError::Serialization(e.to_string()))
}

#[async_trait]
impl Store for SqliteStore {
    async fn ensure_user(&self, username: &str) -> Result<()> {
        let username = username.to_string();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
                params![username, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn insert_permission(&self, username: &str, permission: &str) -> Result<InsertResult> {
        let username = username.to_string();
        let permission = permission.to_string();

        self.blocking(move |conn| {
            let now = now_millis();
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT OR IGNORE INTO users (username, created_at) VALUES (?1, ?2)",
                params![username, now],
            )?;

            let changed = tx.execute(
                "INSERT OR IGNORE INTO user_permissions (username, permission, granted_at)
                 VALUES (?1, ?2, ?3)",
                params![username, permission, now],
            )?;

            tx.commit()?;

            debug!(user = %username, %permission, changed, "stored permission");
            Ok(if changed > 0 {
                InsertResult::Inserted
            } else {
                InsertResult::AlreadyExists
            })
        })
        .await
    }

    async fn load_users(&self) -> Result<Vec<StoredUser>> {
        self.blocking(|conn| {
            let mut users: BTreeMap<String, StoredUser> = BTreeMap::new();

            let mut stmt = conn.prepare("SELECT username FROM users")?;
            let names = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            for username in names {
                users.insert(
                    username.clone(),
                    StoredUser {
                        username,
                        permissions: Default::default(),
                    },
                );
            }

            let mut stmt = conn.prepare("SELECT username, permission FROM user_permissions")?;
            let grants = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            for (username, permission) in grants {
                users
                    .entry(username.clone())
                    .or_insert_with(|| StoredUser {
                        username,
                        permissions: Default::default(),
                    })
                    .permissions
                    .insert(permission);
            }

            Ok(users.into_values().collect())
        })
        .await
    }

    async fn upsert_record(&self, record: &Record) -> Result<()> {
        let (kind, id) = record_key(record)?;
        let body = encode_record(record)?;

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO records (kind, id, body, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(kind, id) DO UPDATE SET
                    body = excluded.body,
                    updated_at = excluded.updated_at",
                params![kind.path(), id, body, now_millis()],
            )?;
            Ok(())
        })
        .await
    }

    async fn list_records(&self, kind: Option<EntityKind>) -> Result<Vec<Record>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT body FROM records
                 WHERE ?1 IS NULL OR kind = ?1
                 ORDER BY kind, id",
            )?;

            let bodies = stmt
                .query_map(params![kind.map(|k| k.path())], |row| {
                    row.get::<_, Vec<u8>>(0)
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            bodies.iter().map(|body| decode_record(body)).collect()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketops_core::{MarketAsset, ModelRegistry};

    fn gold() -> Record {
        let mut asset = MarketAsset {
            id: Some("GOLD".into()),
            name: Some("Gold".into()),
            current_price: Some(2300.0),
            demand: Some(0.4),
            ..Default::default()
        };
        asset.record_history(1_700_000_000_000);
        asset.into()
    }

    #[tokio::test]
    async fn test_permissions_merge() {
        let store = SqliteStore::open_memory().unwrap();

        let r1 = store.insert_permission("alice", "READ:ALL").await.unwrap();
        assert_eq!(r1, InsertResult::Inserted);

        let r2 = store.insert_permission("alice", "READ:ALL").await.unwrap();
        assert_eq!(r2, InsertResult::AlreadyExists);

        store.insert_permission("alice", "WRITE:GOLD").await.unwrap();

        let users = store.load_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(
            users[0].permissions.iter().cloned().collect::<Vec<_>>(),
            vec!["READ:ALL".to_string(), "WRITE:GOLD".to_string()]
        );
    }

    #[tokio::test]
    async fn test_ensure_user_without_permissions() {
        let store = SqliteStore::open_memory().unwrap();
        store.ensure_user("data_scientist").await.unwrap();
        store.ensure_user("data_scientist").await.unwrap();

        let users = store.load_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].permissions.is_empty());
    }

    #[tokio::test]
    async fn test_record_roundtrip_preserves_history() {
        let store = SqliteStore::open_memory().unwrap();
        let record = gold();

        store.upsert_record(&record).await.unwrap();
        let records = store.list_records(Some(EntityKind::MarketAsset)).await.unwrap();

        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_upsert_replaces_case_insensitively() {
        let store = SqliteStore::open_memory().unwrap();
        store.upsert_record(&gold()).await.unwrap();

        let replacement: Record = MarketAsset {
            id: Some("gold".into()),
            current_price: Some(2400.0),
            ..Default::default()
        }
        .into();
        store.upsert_record(&replacement).await.unwrap();

        let records = store.list_records(None).await.unwrap();
        assert_eq!(records, vec![replacement]);
    }

    #[tokio::test]
    async fn test_list_filters_by_kind() {
        let store = SqliteStore::open_memory().unwrap();
        store.upsert_record(&gold()).await.unwrap();
        store
            .upsert_record(
                &ModelRegistry {
                    id: Some("garch".into()),
                    ..Default::default()
                }
                .into(),
            )
            .await
            .unwrap();

        assert_eq!(store.list_records(None).await.unwrap().len(), 2);
        assert_eq!(
            store.list_records(Some(EntityKind::Model)).await.unwrap().len(),
            1
        );
        assert!(store
            .list_records(Some(EntityKind::Simulation))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_reopen_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.insert_permission("admin_user", "ADMIN:ALL").await.unwrap();
            store.upsert_record(&gold()).await.unwrap();
        }

        let store = SqliteStore::open(&path).unwrap();
        let users = store.load_users().await.unwrap();
        assert_eq!(users[0].username, "admin_user");
        assert!(users[0].permissions.contains("ADMIN:ALL"));
        assert_eq!(store.list_records(None).await.unwrap(), vec![gold()]);
    }
}
