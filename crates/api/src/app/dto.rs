use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use farmstand_catalog::{Product, ProductDetails, ProductFilter, Rating, Review};
use farmstand_core::{DomainError, DomainResult};

// -------------------------
// Request DTOs
// -------------------------

/// Decode a JSON request body. An empty body decodes as `T::default()`, the
/// same as `{}`.
pub fn parse_body<T>(bytes: &[u8]) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| format!("malformed request body: {e}"))
}

/// `null` decodes as the field's empty default.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `POST /consumer/filter` body. Field names follow the storefront client.
#[derive(Debug, Default, Deserialize)]
pub struct FilterProductsRequest {
    #[serde(default, alias = "name")]
    pub prod_name: Option<String>,
    #[serde(default, alias = "available_location")]
    pub avalaible_location: Option<String>,
}

impl From<FilterProductsRequest> for ProductFilter {
    fn from(value: FilterProductsRequest) -> Self {
        ProductFilter {
            name: value.prod_name,
            location: value.avalaible_location,
        }
    }
}

/// `PUT /consumer/:id` body.
///
/// Every field is optional on the wire, and an omitted field still overwrites
/// the stored value with its empty default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    #[serde(alias = "prod_name", deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub price: f64,
    #[serde(deserialize_with = "nullable")]
    pub image: String,
    #[serde(deserialize_with = "nullable")]
    pub seller_name: String,
    #[serde(alias = "prod_size", deserialize_with = "nullable")]
    pub size: String,
    #[serde(deserialize_with = "nullable")]
    pub quantity: u32,
    #[serde(alias = "avalaible_location", deserialize_with = "nullable")]
    pub available_location: String,
}

impl From<UpdateProductRequest> for ProductDetails {
    fn from(value: UpdateProductRequest) -> Self {
        ProductDetails {
            name: value.name,
            price: value.price,
            image: value.image,
            seller_name: value.seller_name,
            size: value.size,
            quantity: value.quantity,
            available_location: value.available_location,
        }
    }
}

/// A rating as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RatingInput {
    Number(f64),
    Text(String),
}

impl RatingInput {
    pub fn to_rating(&self) -> DomainResult<Rating> {
        match self {
            RatingInput::Number(n) => Rating::from_number(*n),
            RatingInput::Text(s) => {
                let n: f64 = s.trim().parse().map_err(|_| {
                    DomainError::validation(format!("rating must be a number (got {s:?})"))
                })?;
                Rating::from_number(n)
            }
        }
    }
}

/// `POST /consumer/:id/review` body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateReviewRequest {
    #[serde(default)]
    pub rating: Option<RatingInput>,
    #[serde(default, deserialize_with = "nullable")]
    pub comment: String,
}

impl CreateReviewRequest {
    pub fn rating(&self) -> DomainResult<Rating> {
        self.rating
            .as_ref()
            .ok_or_else(|| DomainError::validation("rating is required"))?
            .to_rating()
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn review_to_json(r: &Review) -> serde_json::Value {
    serde_json::json!({
        "user": r.user.to_string(),
        "name": r.name,
        "rating": r.rating.value(),
        "comment": r.comment,
        "created_at": r.created_at.to_rfc3339(),
    })
}

pub fn product_to_json(p: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": p.id().to_string(),
        "owner": p.owner().to_string(),
        "name": p.name(),
        "seller_name": p.seller_name(),
        "image": p.image(),
        "price": p.price(),
        "size": p.size(),
        "quantity": p.quantity(),
        "available_location": p.available_location(),
        "reviews": p.reviews().iter().map(review_to_json).collect::<Vec<_>>(),
        "num_reviews": p.num_reviews(),
        "rating": p.rating(),
        "created_at": p.created_at().to_rfc3339(),
        "updated_at": p.updated_at().to_rfc3339(),
    })
}

pub fn products_to_json(products: &[Product]) -> serde_json::Value {
    serde_json::Value::Array(products.iter().map(product_to_json).collect())
}
