//! SQLite schema, versioned.
//!
//! Each entry in [`MIGRATIONS`] moves the schema one version forward and is
//! applied at most once. Applied versions are recorded in
//! `schema_migrations`.

use marketops_core::now_millis;
use rusqlite::{params, Connection};
use tracing::info;

use crate::error::{Result, StoreError};

/// Ordered schema steps: `(version, sql)`.
const MIGRATIONS: &[(u32, &str)] = &[
    (
        1,
        r#"
        -- Accounts keyed by lower-case name
        CREATE TABLE users (
            username TEXT PRIMARY KEY,
            created_at INTEGER NOT NULL
        );

        -- One row per ACTION:TARGET, so concurrent grants merge
        CREATE TABLE user_permissions (
            username TEXT NOT NULL,
            permission TEXT NOT NULL,
            granted_at INTEGER NOT NULL,
            PRIMARY KEY (username, permission)
        );
        CREATE INDEX idx_user_permissions_username ON user_permissions(username);
        "#,
    ),
    (
        2,
        r#"
        -- kind is the collection path, id the lower-cased record id
        CREATE TABLE records (
            kind TEXT NOT NULL,
            id TEXT NOT NULL,
            body BLOB NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (kind, id)
        );
        "#,
    ),
];

/// Version the schema ends at after [`migrate`].
pub const CURRENT_VERSION: u32 = 2;

/// Highest applied version, or 0 for a fresh database.
pub fn schema_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> =
        conn.query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })?;
    Ok(version.unwrap_or(0))
}

/// Bring the schema up to [`CURRENT_VERSION`]. Safe to call on every open.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    migrate_to(conn, CURRENT_VERSION)
}

fn migrate_to(conn: &mut Connection, target: u32) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
    )?;

    let from = schema_version(conn)?;
    if from > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "database is at version {from}, newer than supported {CURRENT_VERSION}"
        )));
    }

    let pending: Vec<_> = MIGRATIONS
        .iter()
        .filter(|(version, _)| *version > from && *version <= target)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (version, sql) in pending {
        tx.execute_batch(sql)?;
        tx.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            params![version, now_millis()],
        )?;
    }
    tx.commit()?;

    info!(from, to = target, "migrated schema");
    Ok(())
}
