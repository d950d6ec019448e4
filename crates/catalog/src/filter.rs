//! Exact-match catalog search criteria.

use crate::product::Product;

/// Search by product name and location.
///
/// Both criteria are required: a missing criterion matches nothing, so a
/// half-filled filter returns an empty result instead of the whole catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub location: Option<String>,
}

impl ProductFilter {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            location: Some(location.into()),
        }
    }

    /// Both criteria, if present.
    pub fn criteria(&self) -> Option<(&str, &str)> {
        match (&self.name, &self.location) {
            (Some(name), Some(location)) => Some((name.as_str(), location.as_str())),
            _ => None,
        }
    }

    /// Case-sensitive equality on both fields.
    pub fn matches(&self, product: &Product) -> bool {
        match self.criteria() {
            Some((name, location)) => {
                product.name() == name && product.available_location() == location
            }
            None => false,
        }
    }
}
