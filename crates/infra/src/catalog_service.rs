//! Catalog operations (application-level orchestration).
//!
//! Every operation is a single load → mutate → persist against one product
//! document:
//!
//! ```text
//! request
//!   ↓
//! 1. Parse identifier (malformed → InvalidId)
//!   ↓
//! 2. Load product from store (absent → NotFound)
//!   ↓
//! 3. Apply domain logic (pure; may reject)
//!   ↓
//! 4. Save product (awaited before returning)
//! ```
//!
//! There is no locking across steps 2–4. Two concurrent reviews on the same
//! product race, and the store decides which write wins.

use chrono::Utc;
use thiserror::Error;

use farmstand_catalog::{Product, ProductDetails, ProductFilter, Rating, Reviewer};
use farmstand_core::{DomainError, ProductId, UserId};

use crate::product_store::{ProductStore, StoreError};

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Deterministic domain failure (not found, invalid id, validation,
    /// duplicate review).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Storage collaborator failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Domain(DomainError::NotFound))
    }
}

/// Product catalog service over a `ProductStore`.
#[derive(Debug, Clone)]
pub struct ProductCatalog<S> {
    store: S,
}

impl<S> ProductCatalog<S>
where
    S: ProductStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// All products, unfiltered, in storage order.
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self.store.list().await?;
        tracing::debug!(count = products.len(), "listed products");
        Ok(products)
    }

    /// Exact match on name and location. Missing criteria yield no results.
    pub async fn filter_by(&self, filter: &ProductFilter) -> Result<Vec<Product>, CatalogError> {
        let Some((name, location)) = filter.criteria() else {
            tracing::debug!("filter missing name or location; returning no products");
            return Ok(Vec::new());
        };

        let products = self.store.find_by_filter(name, location).await?;
        tracing::debug!(product_name = name, location, count = products.len(), "filtered products");
        Ok(products)
    }

    pub async fn get_by_id(&self, raw_id: &str) -> Result<Product, CatalogError> {
        let id: ProductId = raw_id.parse()?;
        self.load(id).await
    }

    /// Permanently remove a product and its reviews.
    pub async fn delete(&self, raw_id: &str) -> Result<(), CatalogError> {
        let id: ProductId = raw_id.parse()?;

        if !self.store.delete(id).await? {
            return Err(DomainError::not_found().into());
        }

        tracing::info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Insert a placeholder product owned by `owner`.
    pub async fn create(&self, owner: UserId) -> Result<Product, CatalogError> {
        let product = Product::placeholder(ProductId::new(), owner, Utc::now());
        self.store.save(&product).await?;

        tracing::info!(product_id = %product.id(), owner = %owner, "product created");
        Ok(product)
    }

    /// Overwrite every editable field of a product.
    pub async fn update(&self, raw_id: &str, details: ProductDetails) -> Result<Product, CatalogError> {
        let id: ProductId = raw_id.parse()?;
        let mut product = self.load(id).await?;

        product.apply_update(details, Utc::now())?;
        self.store.save(&product).await?;

        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Append a review by `reviewer` and persist the recomputed summary.
    pub async fn add_review(
        &self,
        raw_id: &str,
        reviewer: &Reviewer,
        rating: Rating,
        comment: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let id: ProductId = raw_id.parse()?;
        let mut product = self.load(id).await?;

        let summary = match product.add_review(reviewer, rating, comment, Utc::now()) {
            Ok(s) => s,
            Err(e) => {
                tracing::info!(product_id = %id, user_id = %reviewer.id, "duplicate review rejected");
                return Err(e.into());
            }
        };
        self.store.save(&product).await?;

        tracing::info!(
            product_id = %id,
            user_id = %reviewer.id,
            num_reviews = summary.num_reviews,
            rating = summary.rating,
            "review added"
        );
        Ok(())
    }

    async fn load(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found().into())
    }
}
