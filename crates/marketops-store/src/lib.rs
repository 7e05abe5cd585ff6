//! # MarketOps Store
//!
//! Persistence for the catalog: users, their permissions and catalog
//! records.
//!
//! ## Overview
//!
//! The catalog serves everything from memory and writes through to a
//! [`Store`]. On startup the store is read back to rebuild that state.
//! [`SqliteStore`] is the durable backend; [`MemoryStore`] keeps the same
//! semantics without a file.
//!
//! ## Key Types
//!
//! - [`Store`] - Async trait the catalog persists through
//! - [`SqliteStore`] - rusqlite-backed store with versioned schema
//! - [`MemoryStore`] - Volatile store with identical semantics
//! - [`StoredUser`] - A user row with its permissions
//! - [`InsertResult`] - Whether a permission row was new
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketops_store::{InsertResult, SqliteStore, Store};
//!
//! async fn persist_admin() {
//!     let store = SqliteStore::open("catalog.db").unwrap();
//!
//!     let first = store.insert_permission("admin_user", "ADMIN:ALL").await.unwrap();
//!     let again = store.insert_permission("admin_user", "ADMIN:ALL").await.unwrap();
//!     assert_eq!((first, again), (InsertResult::Inserted, InsertResult::AlreadyExists));
//! }
//! ```
//!
//! ## Conventions
//!
//! - Callers pass canonical user names and permissions; stores never re-case them
//! - Records key on `(kind, lower-cased id)` and upsert on conflict
//! - Record bodies are tagged CBOR, so any kind decodes without a schema hint

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{InsertResult, Store, StoredUser};
