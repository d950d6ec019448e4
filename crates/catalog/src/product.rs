use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use farmstand_core::{DomainError, DomainResult, ProductId, UserId};

use crate::rating::{Rating, ReviewSummary, summarize_reviews};

/// Placeholder content inserted by `Product::placeholder`.
///
/// Creation is scaffold-then-edit: a product starts with these values and is
/// filled in through a separate update.
pub mod placeholder {
    pub const NAME: &str = "Sample name";
    pub const SELLER_NAME: &str = "Sample seller";
    pub const IMAGE: &str = "/images/consumer/mogra_rice.jpg";
    pub const PRICE: f64 = 0.0;
    pub const SIZE: &str = "0kg";
    pub const QUANTITY: u32 = 0;
    pub const AVAILABLE_LOCATION: &str = "Sample location";
}

/// A single user's review, embedded in its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user: UserId,
    /// Reviewer display name as it was at submission time.
    pub name: String,
    pub rating: Rating,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Identity of the user submitting a review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    pub id: UserId,
    pub name: String,
}

/// Editable product content. An update overwrites every field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub price: f64,
    pub image: String,
    pub seller_name: String,
    pub size: String,
    pub quantity: u32,
    pub available_location: String,
}

impl ProductDetails {
    pub fn validate(&self) -> DomainResult<()> {
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(DomainError::validation(format!(
                "price must be a non-negative amount (got {})",
                self.price
            )));
        }
        Ok(())
    }
}

/// Aggregate root: a consumer product with its embedded reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    owner: UserId,
    name: String,
    seller_name: String,
    image: String,
    price: f64,
    size: String,
    quantity: u32,
    available_location: String,
    reviews: Vec<Review>,
    num_reviews: u32,
    rating: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// New product populated with the fixed placeholder values.
    pub fn placeholder(id: ProductId, owner: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner,
            name: placeholder::NAME.to_string(),
            seller_name: placeholder::SELLER_NAME.to_string(),
            image: placeholder::IMAGE.to_string(),
            price: placeholder::PRICE,
            size: placeholder::SIZE.to_string(),
            quantity: placeholder::QUANTITY,
            available_location: placeholder::AVAILABLE_LOCATION.to_string(),
            reviews: Vec::new(),
            num_reviews: 0,
            rating: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seller_name(&self) -> &str {
        &self.seller_name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn size(&self) -> &str {
        &self.size
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn available_location(&self) -> &str {
        &self.available_location
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    pub fn num_reviews(&self) -> u32 {
        self.num_reviews
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            seller_name: self.seller_name.clone(),
            size: self.size.clone(),
            quantity: self.quantity,
            available_location: self.available_location.clone(),
        }
    }

    pub fn has_review_from(&self, user: UserId) -> bool {
        self.reviews.iter().any(|r| r.user == user)
    }

    /// Overwrite all editable content. Owner and reviews are left alone.
    pub fn apply_update(&mut self, details: ProductDetails, now: DateTime<Utc>) -> DomainResult<()> {
        details.validate()?;

        let ProductDetails {
            name,
            price,
            image,
            seller_name,
            size,
            quantity,
            available_location,
        } = details;

        self.name = name;
        self.price = price;
        self.image = image;
        self.seller_name = seller_name;
        self.size = size;
        self.quantity = quantity;
        self.available_location = available_location;
        self.updated_at = now;
        Ok(())
    }

    /// Append a review and recompute the derived summary.
    ///
    /// Fails with `AlreadyReviewed` if `reviewer` already reviewed this product; the
    /// product is left unchanged in that case.
    pub fn add_review(
        &mut self,
        reviewer: &Reviewer,
        rating: Rating,
        comment: impl Into<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<ReviewSummary> {
        if self.has_review_from(reviewer.id) {
            return Err(DomainError::AlreadyReviewed);
        }

        self.reviews.push(Review {
            user: reviewer.id,
            name: reviewer.name.clone(),
            rating,
            comment: comment.into(),
            created_at: now,
        });

        let summary = summarize_reviews(&self.reviews);
        self.num_reviews = summary.num_reviews;
        self.rating = summary.rating;
        self.updated_at = now;
        Ok(summary)
    }

    pub fn summary(&self) -> ReviewSummary {
        ReviewSummary {
            num_reviews: self.num_reviews,
            rating: self.rating,
        }
    }
}
