use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use farmstand_catalog::Product;
use farmstand_core::ProductId;

use super::r#trait::{ProductStore, StoreError};

/// In-memory product store.
///
/// Intended for tests/dev. Each call takes the lock once, so individual
/// operations are atomic but a load/save pair is not.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(mut products: Vec<Product>) -> Vec<Product> {
        products.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });
        products
    }
}

fn poisoned() -> StoreError {
    StoreError::Unavailable("in-memory product store lock poisoned".to_string())
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(Self::sorted(map.values().cloned().collect()))
    }

    async fn find_by_filter(&self, name: &str, location: &str) -> Result<Vec<Product>, StoreError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        let hits = map
            .values()
            .filter(|p| p.name() == name && p.available_location() == location)
            .cloned()
            .collect();
        Ok(Self::sorted(hits))
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let map = self.products.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn save(&self, product: &Product) -> Result<(), StoreError> {
        let mut map = self.products.write().map_err(|_| poisoned())?;
        map.insert(product.id(), product.clone());
        Ok(())
    }

    async fn delete(&self, id: ProductId) -> Result<bool, StoreError> {
        let mut map = self.products.write().map_err(|_| poisoned())?;
        Ok(map.remove(&id).is_some())
    }
}
