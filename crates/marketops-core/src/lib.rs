//! # MarketOps Core
//!
//! Catalog records and the in-memory object registry.
//!
//! This crate contains no I/O and no access control. It defines what the
//! catalog stores and how records are identified.
//!
//! ## Key Types
//!
//! - [`Entity`] - Identity capability every record type implements
//! - [`EntityKind`] - The catalog collections (`market-assets`, `models`, ...)
//! - [`Record`] - Any catalog record, tagged by kind
//! - [`Registry`] - Case-insensitive id to record store, one namespace per kind
//!
//! ## Usage
//!
//! ```rust
//! use marketops_core::{EntityKind, MarketAsset, Record, Registry};
//!
//! let registry = Registry::new();
//! let asset = MarketAsset {
//!     id: Some("AAPL".into()),
//!     current_price: Some(190.0),
//!     ..Default::default()
//! };
//!
//! registry.register(asset.into());
//! assert!(registry.get(EntityKind::MarketAsset, "aapl").is_some());
//! ```

pub mod entity;
pub mod error;
pub mod record;
pub mod records;
pub mod registry;

pub use entity::{generate_id, now_millis, Entity, EntityKind};
pub use error::{CoreError, Result};
pub use record::Record;
pub use records::{
    DataSet, DataSource, DistributionRegistry, Etl, LineageTracking, LivePriceTracking,
    MarketAsset, MarketAssetHistory, ModelRegistry, SimulationTracking,
};
pub use registry::Registry;
