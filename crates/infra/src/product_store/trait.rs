use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use farmstand_catalog::Product;
use farmstand_core::ProductId;

/// Storage operation error.
///
/// These are **infrastructure errors**, as opposed to the domain errors raised
/// by the catalog itself (not found, duplicate review, validation).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached (pool closed, connection refused, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored document could not be encoded or decoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Persistence collaborator for catalog products.
///
/// Implementations must:
/// - persist a product and its reviews in one write (`save` is an upsert)
/// - return products in a stable, storage-native order (creation order)
/// - apply `find_by_filter` as exact, case-sensitive equality on both fields
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_filter(&self, name: &str, location: &str) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn save(&self, product: &Product) -> Result<(), StoreError>;

    /// Remove a product. Returns `false` if there was nothing to remove.
    async fn delete(&self, id: ProductId) -> Result<bool, StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn find_by_filter(&self, name: &str, location: &str) -> Result<Vec<Product>, StoreError> {
        (**self).find_by_filter(name, location).await
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        (**self).save(product).await
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
