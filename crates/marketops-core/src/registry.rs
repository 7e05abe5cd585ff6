//! In-memory object registry.
//!
//! Backs the catalog's list and get operations. Records are keyed by the
//! lower-cased identifier within their collection, so `AAPL` and `aapl`
//! address the same slot.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::entity::{generate_id, now_millis, EntityKind};
use crate::record::Record;

/// Identifier to record store, one namespace per [`EntityKind`].
///
/// Thread-safe via RwLock. Each insert touches a single slot.
#[derive(Debug, Default)]
pub struct Registry {
    collections: RwLock<HashMap<EntityKind, HashMap<String, Record>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a newly created record.
    ///
    /// Assigns a random id when the record has none. Market assets get a
    /// history snapshot of their current price and demand before storage.
    /// Returns the record as stored.
    pub fn register(&self, mut record: Record) -> Record {
        if record.id().map_or(true, |id| id.trim().is_empty()) {
            record.set_id(generate_id());
        }

        if let Record::MarketAsset(asset) = &mut record {
            asset.record_history(now_millis());
        }

        self.restore(record.clone());
        record
    }

    /// Store a record as-is, without id generation or history side effects.
    ///
    /// Used when loading records that were already registered once.
    /// Records without an id are ignored.
    pub fn restore(&self, record: Record) {
        let Some(key) = record.id().map(str::to_lowercase) else {
            return;
        };
        let kind = record.kind();

        debug!(%kind, id = %key, "registering record");

        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections.entry(kind).or_default().insert(key, record);
    }

    /// Look up a record by id (case-insensitive).
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<Record> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(&kind)
            .and_then(|records| records.get(&id.to_lowercase()))
            .cloned()
    }

    /// Every record of the given kind, in no particular order.
    pub fn all_of_kind(&self, kind: EntityKind) -> Vec<Record> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(&kind)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of records across all collections.
    pub fn len(&self) -> usize {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections.values().map(HashMap::len).sum()
    }

    /// Whether the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{DataSource, MarketAsset, ModelRegistry};

    fn asset(id: &str, price: f64) -> Record {
        MarketAsset {
            id: Some(id.into()),
            current_price: Some(price),
            demand: Some(1.5),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_register_and_get_case_insensitive() {
        let registry = Registry::new();
        registry.register(asset("AAPL", 190.0));

        assert!(registry.get(EntityKind::MarketAsset, "aapl").is_some());
        assert!(registry.get(EntityKind::MarketAsset, "Aapl").is_some());
        assert!(registry.get(EntityKind::MarketAsset, "msft").is_none());
    }

    #[test]
    fn test_kinds_are_separate_namespaces() {
        let registry = Registry::new();
        registry.register(asset("shared", 1.0));
        registry.register(
            DataSource {
                id: Some("shared".into()),
                ..Default::default()
            }
            .into(),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(EntityKind::DataSource, "shared").unwrap().kind(),
            EntityKind::DataSource
        );
        assert!(registry.get(EntityKind::Model, "shared").is_none());
    }

    #[test]
    fn test_register_generates_missing_id() {
        let registry = Registry::new();
        let stored = registry.register(ModelRegistry::default().into());

        let id = stored.id().unwrap().to_string();
        assert_eq!(id.len(), 32);
        assert_eq!(registry.get(EntityKind::Model, &id), Some(stored));
    }

    #[test]
    fn test_register_appends_one_history_entry() {
        let registry = Registry::new();
        let stored = registry.register(asset("gold", 2300.0));

        let Record::MarketAsset(stored) = stored else {
            panic!("expected market asset");
        };
        assert_eq!(stored.history.len(), 1);
        assert_eq!(stored.history[0].price, Some(2300.0));
        assert_eq!(stored.history[0].demand, Some(1.5));
    }

    #[test]
    fn test_restore_has_no_side_effects() {
        let registry = Registry::new();
        registry.restore(asset("gold", 2300.0));

        let Some(Record::MarketAsset(stored)) = registry.get(EntityKind::MarketAsset, "gold")
        else {
            panic!("expected market asset");
        };
        assert!(stored.history.is_empty());
    }

    #[test]
    fn test_all_of_kind() {
        let registry = Registry::new();
        registry.register(asset("a", 1.0));
        registry.register(asset("b", 2.0));
        registry.register(ModelRegistry::default().into());

        assert_eq!(registry.all_of_kind(EntityKind::MarketAsset).len(), 2);
        assert_eq!(registry.all_of_kind(EntityKind::Model).len(), 1);
        assert!(registry.all_of_kind(EntityKind::Simulation).is_empty());
    }

    #[test]
    fn test_reregister_replaces_slot() {
        let registry = Registry::new();
        registry.register(asset("gold", 1.0));
        registry.register(asset("GOLD", 2.0));

        assert_eq!(registry.all_of_kind(EntityKind::MarketAsset).len(), 1);
    }
}
