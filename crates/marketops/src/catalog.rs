//! The Catalog: governed access to catalog records.
//!
//! The Catalog brings together the object registry, the access control
//! engine and a persistence store. Reads and authorization are served from
//! memory; writes go to memory first and then through to the store on a
//! best-effort basis.

use std::collections::BTreeSet;
use std::sync::Arc;

use marketops_core::{EntityKind, Record, Registry};
use marketops_perms::{canonical_token, canonical_user, AccessControl, GrantOutcome, WILDCARD};
use marketops_store::Store;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{CatalogError, Result};

/// Configuration for the Catalog.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Account that receives `admin_permission` at startup.
    pub admin_user: String,
    /// Permission granted to `admin_user` at startup.
    pub admin_permission: String,
    /// Accounts registered (with no permissions) at startup.
    pub seed_users: Vec<String>,
    /// Action required to create records.
    pub write_action: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            admin_user: "admin_user".to_string(),
            admin_permission: "ADMIN:ALL".to_string(),
            seed_users: vec!["data_scientist".to_string()],
            write_action: "ADMIN".to_string(),
        }
    }
}

impl CatalogConfig {
    pub fn with_admin_user(mut self, admin_user: impl Into<String>) -> Self {
        self.admin_user = admin_user.into();
        self
    }

    pub fn with_seed_users<I, U>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = U>,
        U: Into<String>,
    {
        self.seed_users = users.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_write_action(mut self, action: impl Into<String>) -> Self {
        self.write_action = action.into();
        self
    }
}

/// The main Catalog struct.
///
/// Provides:
/// - Authorization checks for callers identified by user name
/// - Create, list and get over every [`EntityKind`]
/// - Textual grant commands for administrators
///
/// Share it between request handlers behind an `Arc`.
pub struct Catalog<S: Store> {
    /// The storage backend.
    store: Arc<S>,
    /// Configuration.
    config: CatalogConfig,
    /// User permissions.
    access: AccessControl,
    /// Records served to readers.
    registry: Registry,
    /// Orders record writes across the registry and the store.
    write_order: Mutex<()>,
}

impl<S: Store> Catalog<S> {
    /// Open a catalog over a store.
    ///
    /// Loads users, permissions and records from the store, then grants
    /// the configured admin permission and registers the seed users. A
    /// store that cannot be read fails the open; write-through failures
    /// during bootstrap are only logged.
    pub async fn open(store: S, config: CatalogConfig) -> Result<Self> {
        let catalog = Self {
            store: Arc::new(store),
            config,
            access: AccessControl::new(),
            registry: Registry::new(),
            write_order: Mutex::new(()),
        };

        catalog.hydrate().await?;
        catalog.bootstrap().await;
        Ok(catalog)
    }

    /// Rebuild in-memory state from the store.
    async fn hydrate(&self) -> Result<()> {
        let users = self.store.load_users().await?;
        for user in &users {
            self.access.register_user(&user.username);
            for permission in &user.permissions {
                self.access.force_grant(&user.username, permission);
            }
        }

        let records = self.store.list_records(None).await?;
        let record_count = records.len();
        for record in records {
            self.registry.restore(record);
        }

        debug!(users = users.len(), records = record_count, "hydrated catalog");
        Ok(())
    }

    /// Grant the admin permission and register seed users.
    async fn bootstrap(&self) {
        let admin = canonical_user(&self.config.admin_user);
        let permission = canonical_token(&self.config.admin_permission);

        self.access.force_grant(&admin, &permission);
        if let Err(e) = self.store.insert_permission(&admin, &permission).await {
            warn!(user = %admin, error = %e, "failed to persist admin grant");
        }

        for user in &self.config.seed_users {
            let user = canonical_user(user);
            self.access.register_user(&user);
            if let Err(e) = self.store.ensure_user(&user).await {
                warn!(%user, error = %e, "failed to persist seed user");
            }
        }

        info!(admin = %admin, %permission, "catalog ready");
    }

    /// Get the configuration.
    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the access control engine.
    pub fn access(&self) -> &AccessControl {
        &self.access
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Check whether a caller may perform `action` on everything.
    ///
    /// A missing caller is always denied.
    pub fn authorize(&self, user: Option<&str>, action: &str) -> bool {
        user.is_some_and(|user| self.access.has_access(user, action, WILDCARD))
    }

    /// Check whether a caller may create records of `kind`.
    ///
    /// Requires the write action on the collection (e.g. `ADMIN:MODELS`)
    /// or on `ALL`.
    pub fn can_write(&self, user: Option<&str>, kind: EntityKind) -> bool {
        user.is_some_and(|user| {
            self.access
                .has_access(user, &self.config.write_action, &kind.target())
        })
    }

    /// A user's current permissions. Empty for unknown users.
    pub fn permissions(&self, user: &str) -> BTreeSet<String> {
        self.access.permissions(user)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a record on behalf of `user`.
    ///
    /// Assigns an id if missing and snapshots market asset history. Returns
    /// the stored record, or [`CatalogError::AccessDenied`] carrying the
    /// caller's permissions.
    pub async fn create(&self, user: Option<&str>, record: Record) -> Result<Record> {
        self.check_write(user, record.kind())?;
        Ok(self.insert(user, record).await)
    }

    /// Create a record from a collection path and a JSON body.
    ///
    /// The caller is authorized against the collection before the body is
    /// decoded, so unauthorized callers never see validation errors.
    pub async fn create_from_json(
        &self,
        user: Option<&str>,
        collection: &str,
        body: &str,
    ) -> Result<Record> {
        let kind: EntityKind = collection.parse()?;
        self.check_write(user, kind)?;
        let record = Record::from_json(kind, body)?;
        Ok(self.insert(user, record).await)
    }

    fn check_write(&self, user: Option<&str>, kind: EntityKind) -> Result<()> {
        if self.can_write(user, kind) {
            return Ok(());
        }

        let permissions = user.map(|u| self.access.permissions(u)).unwrap_or_default();
        warn!(user = ?user, %kind, "create denied");
        Err(CatalogError::AccessDenied {
            user: user.map(String::from),
            permissions,
        })
    }

    /// Register and write through. Creates are serialized so the registry
    /// and the store see the same last writer for every id.
    async fn insert(&self, user: Option<&str>, record: Record) -> Record {
        let kind = record.kind();
        let _order = self.write_order.lock().await;

        let stored = self.registry.register(record);
        if let Err(e) = self.store.upsert_record(&stored).await {
            warn!(%kind, id = ?stored.id(), error = %e, "failed to persist record");
        }

        debug!(user = ?user, %kind, id = ?stored.id(), "created record");
        stored
    }

    /// Every record of a kind, in no particular order.
    pub fn list(&self, kind: EntityKind) -> Vec<Record> {
        self.registry.all_of_kind(kind)
    }

    /// Look up a record by id (case-insensitive).
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<Record> {
        self.registry.get(kind, id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Governance
    // ─────────────────────────────────────────────────────────────────────────

    /// Execute a grant command and return the outcome message.
    pub async fn grant(&self, command: &str) -> String {
        let outcome = self.access.apply_grant(command);

        if let GrantOutcome::Granted(granted) = &outcome {
            let permission = granted.permission().to_string();
            if let Err(e) = self
                .store
                .insert_permission(&granted.username, &permission)
                .await
            {
                warn!(user = %granted.username, %permission, error = %e, "failed to persist grant");
            }
            info!(user = %granted.username, %permission, "grant applied");
        }

        outcome.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketops_core::{MarketAsset, ModelRegistry};
    use marketops_store::MemoryStore;

    async fn catalog() -> Catalog<MemoryStore> {
        Catalog::open(MemoryStore::new(), CatalogConfig::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_grants_admin() {
        let catalog = catalog().await;

        assert!(catalog.access().has_access("admin_user", "DELETE", "anything"));
        assert!(catalog.authorize(Some("ADMIN_USER"), "ADMIN"));
        assert!(catalog.access().contains_user("data_scientist"));
        assert!(catalog.permissions("data_scientist").is_empty());
    }

    #[tokio::test]
    async fn test_missing_user_is_denied() {
        let catalog = catalog().await;
        assert!(!catalog.authorize(None, "ADMIN"));

        let err = catalog
            .create(None, ModelRegistry::default().into())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No Header"));
    }

    #[tokio::test]
    async fn test_denial_carries_permissions() {
        let catalog = catalog().await;
        catalog.grant("GRANT READ ON ALL TO alice").await;

        let err = catalog
            .create(Some("alice"), ModelRegistry::default().into())
            .await
            .unwrap_err();

        match err {
            CatalogError::AccessDenied { user, permissions } => {
                assert_eq!(user.as_deref(), Some("alice"));
                assert!(permissions.contains("READ:ALL"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_json_create_checks_access_before_decoding() {
        let catalog = catalog().await;

        for user in [None, Some("data_scientist")] {
            let err = catalog
                .create_from_json(user, "models", "{garbage")
                .await
                .unwrap_err();
            assert!(
                matches!(err, CatalogError::AccessDenied { .. }),
                "{user:?} -> {err}"
            );
        }

        let err = catalog
            .create_from_json(Some("admin_user"), "models", "{garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Core(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_creates_agree_with_store() {
        let catalog = Arc::new(catalog().await);

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                tokio::spawn(async move {
                    let asset = MarketAsset {
                        id: Some("GOLD".into()),
                        current_price: Some(f64::from(i)),
                        ..Default::default()
                    };
                    catalog.create(Some("admin_user"), asset.into()).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let in_memory = catalog.get(EntityKind::MarketAsset, "gold");
        let persisted = catalog
            .store()
            .list_records(Some(EntityKind::MarketAsset))
            .await
            .unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(in_memory, persisted.into_iter().next());
    }

    #[tokio::test]
    async fn test_collection_scoped_write() {
        let catalog = catalog().await;
        catalog.grant("GRANT ADMIN ON models TO quant").await;

        assert!(catalog
            .create(Some("quant"), ModelRegistry::default().into())
            .await
            .is_ok());
        assert!(catalog
            .create(Some("quant"), MarketAsset::default().into())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_create_persists_through() {
        let catalog = catalog().await;
        let stored = catalog
            .create(
                Some("admin_user"),
                MarketAsset {
                    id: Some("Gold".into()),
                    current_price: Some(2300.0),
                    ..Default::default()
                }
                .into(),
            )
            .await
            .unwrap();

        assert_eq!(catalog.get(EntityKind::MarketAsset, "GOLD"), Some(stored.clone()));
        assert_eq!(
            catalog.store().list_records(None).await.unwrap(),
            vec![stored]
        );
    }
}
