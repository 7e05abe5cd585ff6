//! Entity identity.
//!
//! Every record stored in the catalog exposes its identifier through the
//! [`Entity`] trait. Kinds map one-to-one onto catalog collections.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::Record;

/// The collections a catalog holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    MarketAsset,
    DataSource,
    DataSet,
    Etl,
    Lineage,
    LivePrice,
    Model,
    Distribution,
    Simulation,
}

impl EntityKind {
    /// Every kind, in collection order.
    pub const ALL: [EntityKind; 9] = [
        EntityKind::MarketAsset,
        EntityKind::DataSource,
        EntityKind::DataSet,
        EntityKind::Etl,
        EntityKind::Lineage,
        EntityKind::LivePrice,
        EntityKind::Model,
        EntityKind::Distribution,
        EntityKind::Simulation,
    ];

    /// Collection path segment, e.g. `market-assets`.
    ///
    /// Also used as the storage tag for persisted records.
    pub fn path(&self) -> &'static str {
        match self {
            EntityKind::MarketAsset => "market-assets",
            EntityKind::DataSource => "data-sources",
            EntityKind::DataSet => "data-sets",
            EntityKind::Etl => "etl",
            EntityKind::Lineage => "lineage",
            EntityKind::LivePrice => "live-prices",
            EntityKind::Model => "models",
            EntityKind::Distribution => "distributions",
            EntityKind::Simulation => "simulations",
        }
    }

    /// Permission target naming the whole collection, e.g. `MARKET-ASSETS`.
    pub fn target(&self) -> String {
        self.path().to_ascii_uppercase()
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for EntityKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim().trim_matches('/');
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.path().eq_ignore_ascii_case(path))
            .ok_or_else(|| CoreError::UnknownKind(s.to_string()))
    }
}

/// A record type that can be stored in the catalog.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The collection this type belongs to.
    const KIND: EntityKind;

    /// The record's identifier, if it carries one.
    fn id(&self) -> Option<&str>;

    /// Replace the record's identifier.
    fn set_id(&mut self, id: String);

    /// Wrap into the catalog-wide record enum.
    fn into_record(self) -> Record;
}

/// Generate a fresh random identifier (32 lower-case hex characters).
pub fn generate_id() -> String {
    hex::encode(rand::random::<[u8; 16]>())
}

/// Current time in Unix milliseconds.
pub fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
