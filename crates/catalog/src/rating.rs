//! Review ratings and the review summary fold.

use serde::{Deserialize, Serialize};

use farmstand_core::{DomainError, DomainResult};

use crate::product::Review;

/// Star rating attached to a review (whole number, 1 to 5 inclusive).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> DomainResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::validation(format!(
                "rating must be between {} and {} (got {value})",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Coerce an arbitrary numeric input into a rating.
    ///
    /// Clients send ratings as JSON numbers or numeric strings; anything that is
    /// not a whole number in range is rejected.
    pub fn from_number(value: f64) -> DomainResult<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(DomainError::validation(format!(
                "rating must be a whole number (got {value})"
            )));
        }
        if value < f64::from(Self::MIN) || value > f64::from(Self::MAX) {
            return Err(DomainError::validation(format!(
                "rating must be between {} and {} (got {value})",
                Self::MIN,
                Self::MAX
            )));
        }
        Self::new(value as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl core::fmt::Display for Rating {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Derived review fields stored on a product.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub num_reviews: u32,
    pub rating: f64,
}

impl ReviewSummary {
    pub const EMPTY: ReviewSummary = ReviewSummary {
        num_reviews: 0,
        rating: 0.0,
    };
}

/// Recompute the review count and mean rating from scratch.
///
/// Always a full fold over `reviews`, never an incremental update. An empty
/// slice yields a zero rating.
pub fn summarize_reviews(reviews: &[Review]) -> ReviewSummary {
    if reviews.is_empty() {
        return ReviewSummary::EMPTY;
    }

    let total: u64 = reviews.iter().map(|r| u64::from(r.rating.value())).sum();
    let count = reviews.len();

    ReviewSummary {
        num_reviews: count as u32,
        rating: total as f64 / count as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use farmstand_core::UserId;

    fn review(stars: u8) -> Review {
        Review {
            user: UserId::new(),
            name: "reviewer".to_string(),
            rating: Rating::new(stars).unwrap(),
            comment: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rating_rejects_out_of_range() {
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
        assert_eq!(Rating::new(5).unwrap().value(), 5);
    }

    #[test]
    fn rating_from_number_requires_whole_numbers() {
        assert_eq!(Rating::from_number(4.0).unwrap().value(), 4);
        assert!(Rating::from_number(3.5).is_err());
        assert!(Rating::from_number(f64::NAN).is_err());
        assert!(Rating::from_number(-1.0).is_err());
        assert!(Rating::from_number(300.0).is_err());
    }

    #[test]
    fn rating_deserialization_is_validated() {
        let ok: Rating = serde_json::from_str("3").unwrap();
        assert_eq!(ok.value(), 3);
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }

    #[test]
    fn empty_reviews_summarize_to_zero() {
        assert_eq!(summarize_reviews(&[]), ReviewSummary::EMPTY);
    }

    #[test]
    fn summary_is_mean_of_ratings() {
        let summary = summarize_reviews(&[review(4), review(2)]);
        assert_eq!(summary.num_reviews, 2);
        assert_eq!(summary.rating, 3.0);

        let summary = summarize_reviews(&[review(5), review(4), review(4)]);
        assert_eq!(summary.num_reviews, 3);
        assert!((summary.rating - 13.0 / 3.0).abs() < 1e-9);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: count equals length and the mean stays inside the rating range.
            #[test]
            fn summary_matches_independent_fold(stars in prop::collection::vec(1u8..=5, 1..64)) {
                let reviews: Vec<Review> = stars.iter().copied().map(review).collect();
                let summary = summarize_reviews(&reviews);

                prop_assert_eq!(summary.num_reviews as usize, stars.len());

                let expected = stars.iter().map(|s| f64::from(*s)).sum::<f64>() / stars.len() as f64;
                prop_assert!((summary.rating - expected).abs() < 1e-9);
                prop_assert!(summary.rating >= 1.0 && summary.rating <= 5.0);
            }

            /// Property: the fold does not depend on review order.
            #[test]
            fn summary_is_order_independent(stars in prop::collection::vec(1u8..=5, 1..32)) {
                let forward: Vec<Review> = stars.iter().copied().map(review).collect();
                let mut backward = forward.clone();
                backward.reverse();

                let a = summarize_reviews(&forward);
                let b = summarize_reviews(&backward);
                prop_assert_eq!(a.num_reviews, b.num_reviews);
                prop_assert!((a.rating - b.rating).abs() < 1e-9);
            }
        }
    }
}
