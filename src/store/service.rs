use std::sync::Arc;
use std::time::Duration;

use crate::clock::Clock;
use crate::config::{AppConfig, StoreBackend};
use crate::database::manager::Database;
use crate::database::models::person::Person;
use crate::observer::pipeline::ObserverPipeline;

use super::{PersonStore, SqlPersonStore, StoreError, TrackedPersonStore};

/// Access facade over whichever [`PersonStore`] was composed at startup.
/// Pure delegation; cloning shares the same store.
#[derive(Clone)]
pub struct PersonService {
    store: Arc<dyn PersonStore>,
}

impl PersonService {
    pub fn new(store: Arc<dyn PersonStore>) -> Self {
        Self { store }
    }

    /// Build the facade for `backend` with the given pipeline
    pub fn compose(backend: StoreBackend, db: Database, pipeline: Arc<ObserverPipeline>) -> Self {
        let store: Arc<dyn PersonStore> = match backend {
            StoreBackend::Tracked => Arc::new(TrackedPersonStore::new(db, pipeline)),
            StoreBackend::Sql => Arc::new(SqlPersonStore::new(db, pipeline)),
        };
        tracing::info!("Person store composed with {:?} backend", backend);
        Self::new(store)
    }

    /// Build the facade described by `config`, stamping time from `clock`
    pub fn from_config(config: &AppConfig, db: Database, clock: Arc<dyn Clock>) -> Self {
        let pipeline = ObserverPipeline::standard(
            clock,
            Duration::from_millis(config.store.observer_timeout_ms),
            config.security.enable_audit_logging,
        );
        Self::compose(config.store.backend, db, Arc::new(pipeline))
    }

    pub fn backend(&self) -> StoreBackend {
        self.store.backend()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Person>, StoreError> {
        self.store.get(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Person>, StoreError> {
        self.store.get_all().await
    }

    pub async fn add(&self, person: &mut Person) -> Result<(), StoreError> {
        self.store.add(person).await
    }

    pub async fn update(&self, person: &mut Person) -> Result<(), StoreError> {
        self.store.update(person).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.store.delete(id).await
    }
}
