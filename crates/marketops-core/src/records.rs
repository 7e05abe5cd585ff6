//! Catalog record types.
//!
//! Records are flat and mostly optional: the catalog only relies on the
//! identifier. Field names serialize in camelCase to match the wire shape
//! used by catalog clients.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{now_millis, Entity, EntityKind};
use crate::record::Record;

/// A data feed the catalog knows about (file, API, cloud bucket).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSource {
    pub id: Option<String>,
    pub name: Option<String>,
    /// live, static
    #[serde(rename = "type")]
    pub source_type: Option<String>,
    /// api, json, csv, text
    pub format: Option<String>,
    /// File path or API url.
    pub connection_data: Option<String>,
}

/// A tradeable or tracked asset with a price and demand history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketAsset {
    pub id: Option<String>,
    pub name: Option<String>,
    /// stock, bond, commodity, job-skill, other
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub demand: Option<f64>,
    pub current_price: Option<f64>,
    pub history: Vec<MarketAssetHistory>,
}

impl MarketAsset {
    /// Append a snapshot of the current price and demand to the history.
    pub fn record_history(&mut self, timestamp: i64) {
        self.history.push(MarketAssetHistory {
            price: self.current_price,
            demand: self.demand,
            timestamp,
        });
    }
}

/// Point-in-time snapshot of a [`MarketAsset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketAssetHistory {
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub demand: Option<f64>,
    #[serde(default = "now_millis")]
    pub timestamp: i64,
}

/// A curated data set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSet {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub schema: Option<String>,
    pub path: Option<String>,
}

/// An extract/transform/load job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Etl {
    pub id: Option<String>,
    pub name: Option<String>,
    /// scheduled, event-based, manual
    pub trigger_type: Option<String>,
    pub data_source_id: Option<String>,
    pub data_set_id: Option<String>,
    pub path: Option<String>,
    /// python, java, sql
    pub language: Option<String>,
}

/// Lineage link between a source, an asset and the model that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageTracking {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub data_source_id: Option<String>,
    #[serde(default)]
    pub market_asset_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub model_registry_id: Option<String>,
    /// creation, transformation, consumption
    #[serde(default)]
    pub change_type: Option<String>,
    #[serde(default = "now_millis")]
    pub timestamp: i64,
}

impl Default for LineageTracking {
    fn default() -> Self {
        Self {
            id: None,
            data_source_id: None,
            market_asset_id: None,
            user_id: None,
            model_registry_id: None,
            change_type: None,
            timestamp: now_millis(),
        }
    }
}

/// Live price watch with a tolerance band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LivePriceTracking {
    pub id: Option<String>,
    pub name: Option<String>,
    pub model_id: Option<String>,
    pub data_source_id: Option<String>,
    pub simulation_tracking_id: Option<String>,
    pub tolerance_range_start: Option<f64>,
    pub tolerance_range_end: Option<f64>,
}

/// Registered model and its parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelRegistry {
    pub id: Option<String>,
    pub model_name: Option<String>,
    pub description: Option<String>,
    pub parameters: BTreeMap<String, String>,
}

/// Registered factor distribution and its summary statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DistributionRegistry {
    pub id: Option<String>,
    pub factor_name: Option<String>,
    pub signal_type: Option<String>,
    pub statistics: BTreeMap<String, f64>,
}

/// Simulation definition mapping equation terms to distributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimulationTracking {
    pub id: Option<String>,
    pub name: Option<String>,
    pub equation: Option<String>,
    pub distribution_mapping: BTreeMap<String, String>,
}

macro_rules! impl_entity {
    ($ty:ident, $kind:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            fn set_id(&mut self, id: String) {
                self.id = Some(id);
            }

            fn into_record(self) -> Record {
                Record::$kind(self)
            }
        }
    };
}

impl_entity!(MarketAsset, MarketAsset);
impl_entity!(DataSource, DataSource);
impl_entity!(DataSet, DataSet);
impl_entity!(Etl, Etl);
impl_entity!(LineageTracking, Lineage);
impl_entity!(LivePriceTracking, LivePrice);
impl_entity!(ModelRegistry, Model);
impl_entity!(DistributionRegistry, Distribution);
impl_entity!(SimulationTracking, Simulation);
