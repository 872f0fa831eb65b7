use std::sync::Arc;

use dashmap::DashMap;
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use shared::{SyncAction, SyncEvent};

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::ImageStore;
use crate::sync::SyncBus;

/// Per-resource version counters
///
/// Lock-free via DashMap. Each resource type keeps an independent counter,
/// incremented atomically on every broadcast so clients can order snapshots
/// and discard stale ones.
#[derive(Debug, Default)]
pub struct ResourceVersions {
    versions: DashMap<String, u64>,
}

impl ResourceVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter for a resource and return the new value.
    pub fn increment(&self, resource: &str) -> u64 {
        let mut entry = self.versions.entry(resource.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// Current counter, 0 when the resource was never broadcast.
    pub fn get(&self, resource: &str) -> u64 {
        self.versions.get(resource).map(|v| *v).unwrap_or(0)
    }
}

/// Server state, the shared handles for all services
///
/// Cloning is shallow; everything inside is an `Arc` or a cheap handle.
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub sync_bus: SyncBus,
    pub image_store: ImageStore,
    pub jwt_service: Arc<JwtService>,
    pub resource_versions: Arc<ResourceVersions>,
}

impl ServerState {
    /// Initialize all services from configuration.
    ///
    /// # Panics
    ///
    /// Panics when the working directory or database cannot be initialized;
    /// the server cannot run without either.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("carta.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        Self::with_db(config.clone(), db_service.db)
    }

    /// Assemble state around an existing database handle (tests use an
    /// in-memory instance).
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let image_store = ImageStore::new(config.images_dir(), config.public_base_url.clone());
        Self {
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            sync_bus: SyncBus::default(),
            resource_versions: Arc::new(ResourceVersions::new()),
            image_store,
            config,
            db,
        }
    }

    pub fn jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Broadcast a change notification to all subscribed views.
    ///
    /// The version is incremented per resource type; `data` is the whole
    /// entity snapshot (`None` for deletions).
    pub fn broadcast_sync<T: serde::Serialize>(
        &self,
        resource: &str,
        action: SyncAction,
        id: &str,
        data: Option<&T>,
    ) {
        let version = self.resource_versions.increment(resource);
        let event = SyncEvent::new(
            resource,
            version,
            action,
            id,
            data.and_then(|d| serde_json::to_value(d).ok()),
        );
        let receivers = self.sync_bus.publish(event);
        tracing::debug!(resource, version, receivers, "sync event published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_increment_independently_per_resource() {
        let versions = ResourceVersions::new();
        assert_eq!(versions.increment("product"), 1);
        assert_eq!(versions.increment("product"), 2);
        assert_eq!(versions.increment("waiter"), 1);
        assert_eq!(versions.get("product"), 2);
        assert_eq!(versions.get("settings"), 0);
    }
}
