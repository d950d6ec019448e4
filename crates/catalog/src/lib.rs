//! Consumer product catalog domain module.
//!
//! This crate contains the business rules for catalog products and their
//! embedded reviews, implemented purely as deterministic domain logic (no IO,
//! no HTTP, no storage).

pub mod filter;
pub mod product;
pub mod rating;

pub use filter::ProductFilter;
pub use product::{Product, ProductDetails, Review, Reviewer, placeholder};
pub use rating::{Rating, ReviewSummary, summarize_reviews};
