//! Infrastructure layer: product storage and the catalog service.

pub mod catalog_service;
pub mod product_store;

pub use catalog_service::{CatalogError, ProductCatalog};
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
