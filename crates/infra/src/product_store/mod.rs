//! Product persistence boundary.
//!
//! Products are stored as whole documents: a product and its embedded reviews
//! are always read and written together.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductStore, StoreError};
