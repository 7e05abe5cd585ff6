//! The catalog-wide record enum.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::error::Result;
use crate::records::{
    DataSet, DataSource, DistributionRegistry, Etl, LineageTracking, LivePriceTracking,
    MarketAsset, ModelRegistry, SimulationTracking,
};

/// Any record the catalog can hold.
///
/// Serialized with an explicit kind tag so persisted bodies decode without
/// knowing their collection up front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "body")]
pub enum Record {
    MarketAsset(MarketAsset),
    DataSource(DataSource),
    DataSet(DataSet),
    Etl(Etl),
    Lineage(LineageTracking),
    LivePrice(LivePriceTracking),
    Model(ModelRegistry),
    Distribution(DistributionRegistry),
    Simulation(SimulationTracking),
}

macro_rules! dispatch {
    ($record:expr, $inner:ident => $body:expr) => {
        match $record {
            Record::MarketAsset($inner) => $body,
            Record::DataSource($inner) => $body,
            Record::DataSet($inner) => $body,
            Record::Etl($inner) => $body,
            Record::Lineage($inner) => $body,
            Record::LivePrice($inner) => $body,
            Record::Model($inner) => $body,
            Record::Distribution($inner) => $body,
            Record::Simulation($inner) => $body,
        }
    };
}

impl Record {
    /// The collection this record belongs to.
    pub fn kind(&self) -> EntityKind {
        match self {
            Record::MarketAsset(_) => EntityKind::MarketAsset,
            Record::DataSource(_) => EntityKind::DataSource,
            Record::DataSet(_) => EntityKind::DataSet,
            Record::Etl(_) => EntityKind::Etl,
            Record::Lineage(_) => EntityKind::Lineage,
            Record::LivePrice(_) => EntityKind::LivePrice,
            Record::Model(_) => EntityKind::Model,
            Record::Distribution(_) => EntityKind::Distribution,
            Record::Simulation(_) => EntityKind::Simulation,
        }
    }

    /// The record's identifier, if any.
    pub fn id(&self) -> Option<&str> {
        dispatch!(self, inner => inner.id())
    }

    /// Replace the record's identifier.
    pub fn set_id(&mut self, id: String) {
        dispatch!(self, inner => inner.set_id(id))
    }

    /// Decode a request body for the given collection.
    pub fn from_json(kind: EntityKind, body: &str) -> Result<Self> {
        let record = match kind {
            EntityKind::MarketAsset => Record::MarketAsset(serde_json::from_str(body)?),
            EntityKind::DataSource => Record::DataSource(serde_json::from_str(body)?),
            EntityKind::DataSet => Record::DataSet(serde_json::from_str(body)?),
            EntityKind::Etl => Record::Etl(serde_json::from_str(body)?),
            EntityKind::Lineage => Record::Lineage(serde_json::from_str(body)?),
            EntityKind::LivePrice => Record::LivePrice(serde_json::from_str(body)?),
            EntityKind::Model => Record::Model(serde_json::from_str(body)?),
            EntityKind::Distribution => Record::Distribution(serde_json::from_str(body)?),
            EntityKind::Simulation => Record::Simulation(serde_json::from_str(body)?),
        };
        Ok(record)
    }

    /// Encode the record body (without the kind tag) as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(dispatch!(self, inner => serde_json::to_string(inner))?)
    }
}

impl<E: Entity> From<E> for Record {
    fn from(entity: E) -> Self {
        entity.into_record()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_picks_collection_type() {
        let record = Record::from_json(
            EntityKind::MarketAsset,
            r#"{"id":"GOLD","name":"Gold","type":"commodity","currentPrice":2300.0,"demand":0.4}"#,
        )
        .unwrap();

        assert_eq!(record.kind(), EntityKind::MarketAsset);
        assert_eq!(record.id(), Some("GOLD"));
        match record {
            Record::MarketAsset(asset) => {
                assert_eq!(asset.current_price, Some(2300.0));
                assert!(asset.history.is_empty());
            }
            other => panic!("unexpected record: {other:?}"),
        }
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Record::from_json(EntityKind::Etl, "{not json").is_err());
    }

    #[test]
    fn test_set_id_dispatches() {
        let mut record: Record = Etl::default().into();
        assert_eq!(record.id(), None);

        record.set_id("nightly_load".into());
        assert_eq!(record.id(), Some("nightly_load"));
        assert_eq!(record.kind(), EntityKind::Etl);
    }

    #[test]
    fn test_to_json_omits_kind_tag() {
        let record: Record = DataSet {
            id: Some("prices".into()),
            ..Default::default()
        }
        .into();

        let json: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["id"], "prices");
        assert!(json.get("kind").is_none());
    }
}
