//! Shopper reviews of catalog items.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{IdentityId, ItemId, ReviewId};

/// Errors that can occur when constructing a [`ReviewRating`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("rating must be between {min} and {max} (got {got})")]
    OutOfRange { min: u8, max: u8, got: i64 },
}

/// A star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct ReviewRating(u8);

impl ReviewRating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a rating.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` unless `1 <= stars <= 5`.
    pub fn new(stars: i64) -> Result<Self, RatingError> {
        u8::try_from(stars)
            .ok()
            .filter(|s| (Self::MIN..=Self::MAX).contains(s))
            .map(Self)
            .ok_or(RatingError::OutOfRange {
                min: Self::MIN,
                max: Self::MAX,
                got: stars,
            })
    }

    /// Number of stars.
    #[must_use]
    pub const fn stars(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for ReviewRating {
    type Error = RatingError;

    fn try_from(stars: i64) -> Result<Self, Self::Error> {
        Self::new(stars)
    }
}

impl From<ReviewRating> for u8 {
    fn from(rating: ReviewRating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for ReviewRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

/// A review left by a signed-in shopper.
///
/// At most one review exists per `(author, item_id)` pair. Only the author
/// may edit or delete it; any shopper may like it once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub author: IdentityId,
    pub item_id: ItemId,
    pub rating: ReviewRating,
    pub body: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every edit; reviews are listed newest first by this.
    pub updated_at: DateTime<Utc>,
    pub likes: u32,
    #[serde(default)]
    pub liked_by: BTreeSet<IdentityId>,
}

impl Review {
    /// Whether `identity` has liked this review.
    #[must_use]
    pub fn is_liked_by(&self, identity: &IdentityId) -> bool {
        self.liked_by.contains(identity)
    }
}

/// Fields an author may change on an existing review.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPatch {
    pub rating: Option<ReviewRating>,
    pub body: Option<String>,
}

impl ReviewPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rating.is_none() && self.body.is_none()
    }
}
