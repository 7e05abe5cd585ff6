//! # MarketOps
//!
//! A governed catalog of market data records: assets, data sources, data
//! sets, ETL jobs, lineage, live price trackers and model / distribution /
//! simulation registries.
//!
//! ## Overview
//!
//! The [`Catalog`] is what a transport layer (HTTP handlers, a CLI) calls:
//!
//! - **Create**: checked against the caller's permissions before anything
//!   is stored
//! - **List / Get**: served from the in-memory registry
//! - **Grant**: `GRANT <ACTION> ON <TARGET> TO <USER>` commands from
//!   administrators
//!
//! At open, the configured administrator receives `ADMIN:ALL`, so the
//! first request can already create records and grant permissions.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketops::{Catalog, CatalogConfig};
//! use marketops::core::{EntityKind, MarketAsset};
//! use marketops::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("catalog.db").unwrap();
//!     let catalog = Catalog::open(store, CatalogConfig::default()).await.unwrap();
//!
//!     let asset = MarketAsset {
//!         id: Some("GOLD".into()),
//!         current_price: Some(2300.0),
//!         ..Default::default()
//!     };
//!     catalog.create(Some("admin_user"), asset.into()).await.unwrap();
//!
//!     let message = catalog.grant("GRANT READ ON ALL TO alice").await;
//!     assert!(message.starts_with("SUCCESS"));
//!
//!     let assets = catalog.list(EntityKind::MarketAsset);
//!     assert_eq!(assets.len(), 1);
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `marketops::core` - Records, entity kinds and the registry
//! - `marketops::perms` - The access control engine
//! - `marketops::store` - Storage abstraction and SQLite

pub mod catalog;
pub mod error;

// Re-export component crates
pub use marketops_core as core;
pub use marketops_perms as perms;
pub use marketops_store as store;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogConfig};
pub use error::{CatalogError, Result};

pub use marketops_core::{Entity, EntityKind, Record};
pub use marketops_perms::{AccessControl, GrantCommand, GrantOutcome, Permission};
