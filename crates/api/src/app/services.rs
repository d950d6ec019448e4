use std::sync::Arc;

use anyhow::Context;

use farmstand_infra::{InMemoryProductStore, PostgresProductStore, ProductCatalog, ProductStore};

use crate::config::AppConfig;

/// Type-erased store so the router does not care which backend is in use.
pub type SharedProductStore = Arc<dyn ProductStore>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::InMemory => "in_memory",
            StoreBackend::Postgres => "postgres",
        }
    }
}

/// Services shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    catalog: ProductCatalog<SharedProductStore>,
    backend: StoreBackend,
}

impl AppServices {
    pub fn new(store: SharedProductStore, backend: StoreBackend) -> Self {
        Self {
            catalog: ProductCatalog::new(store),
            backend,
        }
    }

    /// Fresh in-memory catalog (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), StoreBackend::InMemory)
    }

    /// Pick the store from configuration; Postgres also gets its schema ensured.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let Some(db) = &config.database else {
            return Ok(Self::in_memory());
        };

        let store = PostgresProductStore::connect(&db.url, db.max_connections)
            .await
            .context("failed to connect to postgres")?;
        store
            .ensure_schema()
            .await
            .context("failed to prepare consumer_products schema")?;

        Ok(Self::new(Arc::new(store), StoreBackend::Postgres))
    }

    pub fn catalog(&self) -> &ProductCatalog<SharedProductStore> {
        &self.catalog
    }

    pub fn backend(&self) -> StoreBackend {
        self.backend
    }
}
