//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use serde_json::json;

use marketops::{Catalog, CatalogConfig};
use marketops_core::{EntityKind, MarketAsset, Record};
use marketops_store::MemoryStore;

/// A catalog over an in-memory store, opened with the default config.
pub struct TestFixture {
    pub catalog: Catalog<MemoryStore>,
}

impl TestFixture {
    /// Open a fixture with the default admin and seed users.
    pub async fn new() -> Self {
        Self::with_config(CatalogConfig::default()).await
    }

    /// Open a fixture with a custom config.
    pub async fn with_config(config: CatalogConfig) -> Self {
        let catalog = Catalog::open(MemoryStore::new(), config)
            .await
            .expect("memory store never fails to load");
        Self { catalog }
    }

    /// The configured administrator.
    pub fn admin(&self) -> &str {
        &self.catalog.config().admin_user
    }

    /// Run a grant command and panic if it was rejected.
    pub async fn grant(&self, command: &str) {
        let message = self.catalog.grant(command).await;
        assert!(message.starts_with("SUCCESS"), "{command:?} -> {message}");
    }

    /// Create a record as the administrator.
    pub async fn create_as_admin(&self, record: Record) -> Record {
        self.catalog
            .create(Some(self.admin()), record)
            .await
            .expect("admin may create anything")
    }

    /// Create one sample record of every kind as the administrator.
    pub async fn populate(&self) -> Vec<Record> {
        let mut stored = Vec::new();
        for record in sample_records() {
            stored.push(self.create_as_admin(record).await);
        }
        stored
    }
}

/// A market asset with a price and demand, ready to create.
pub fn sample_asset(id: &str, price: f64, demand: f64) -> Record {
    MarketAsset {
        id: Some(id.to_string()),
        name: Some(id.to_string()),
        asset_type: Some("commodity".to_string()),
        current_price: Some(price),
        demand: Some(demand),
        ..Default::default()
    }
    .into()
}

/// One record of every kind, decoded from request-shaped JSON.
pub fn sample_records() -> Vec<Record> {
    let bodies = [
        (
            EntityKind::MarketAsset,
            json!({"id": "GOLD", "name": "Gold", "type": "commodity", "currentPrice": 2300.0, "demand": 0.4}),
        ),
        (
            EntityKind::DataSource,
            json!({"id": "fx-feed", "name": "FX feed", "type": "live", "format": "api", "connectionData": "wss://fx"}),
        ),
        (
            EntityKind::DataSet,
            json!({"id": "fx-daily", "name": "FX daily", "schema": "pair,close", "path": "/data/fx"}),
        ),
        (
            EntityKind::Etl,
            json!({"id": "fx-load", "triggerType": "scheduled", "dataSourceId": "fx-feed", "language": "python"}),
        ),
        (
            EntityKind::Lineage,
            json!({"id": "fx-lineage", "dataSourceId": "fx-feed", "changeType": "creation", "timestamp": 1_700_000_000_000_i64}),
        ),
        (
            EntityKind::LivePrice,
            json!({"id": "gold-watch", "modelId": "garch", "toleranceRangeStart": 2200.0, "toleranceRangeEnd": 2400.0}),
        ),
        (
            EntityKind::Model,
            json!({"id": "garch", "modelName": "GARCH(1,1)", "parameters": {"p": "1", "q": "1"}}),
        ),
        (
            EntityKind::Distribution,
            json!({"id": "vol", "factorName": "volatility", "statistics": {"mean": 0.2, "std": 0.05}}),
        ),
        (
            EntityKind::Simulation,
            json!({"id": "mc", "equation": "S * exp(vol)", "distributionMapping": {"vol": "vol"}}),
        ),
    ];

    bodies
        .into_iter()
        .map(|(kind, body)| {
            Record::from_json(kind, &body.to_string()).expect("sample bodies are well-formed")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketops_store::Store;

    #[test]
    fn test_sample_records_cover_every_kind() {
        let kinds: Vec<_> = sample_records().iter().map(Record::kind).collect();
        assert_eq!(kinds, EntityKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_populate_stores_every_kind() {
        let fixture = TestFixture::new().await;
        let stored = fixture.populate().await;

        for record in &stored {
            let id = record.id().unwrap();
            assert_eq!(fixture.catalog.get(record.kind(), id).as_ref(), Some(record));
        }
        assert_eq!(
            fixture.catalog.store().list_records(None).await.unwrap().len(),
            EntityKind::ALL.len()
        );
    }

    #[tokio::test]
    async fn test_market_asset_history_snapshot() {
        let fixture = TestFixture::new().await;
        let stored = fixture.create_as_admin(sample_asset("SILVER", 27.5, 0.7)).await;

        let Record::MarketAsset(asset) = stored else {
            panic!("expected market asset");
        };
        assert_eq!(asset.history.len(), 1);
        assert_eq!(asset.history[0].price, Some(27.5));
        assert_eq!(asset.history[0].demand, Some(0.7));
        assert!(asset.history[0].timestamp > 0);
    }

    #[tokio::test]
    async fn test_grant_helper_enables_collection_writes() {
        let fixture = TestFixture::new().await;
        fixture.grant("GRANT ADMIN ON simulations TO quant").await;

        let simulation = sample_records()
            .into_iter()
            .find(|r| r.kind() == EntityKind::Simulation)
            .unwrap();
        assert!(fixture.catalog.create(Some("quant"), simulation).await.is_ok());
        assert!(fixture
            .catalog
            .create(Some("quant"), sample_asset("OIL", 80.0, 0.5))
            .await
            .is_err());
    }
}
