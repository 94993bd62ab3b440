//! Shared review collection.
//!
//! Reviews are global: every shopper reads the same list. Mutation is gated
//! by authorship (edit and delete) and by the liker set (like and unlike).
//! Rejected operations leave state untouched and are never persisted.
//!
//! One review per `(author, item)` is enforced here, against this process's
//! in-memory copy. Two writers racing through separate processes can both
//! pass the check; a single writer per session is assumed.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::instrument;

use zafago_core::{IdentityId, ItemId, Review, ReviewId, ReviewPatch, ReviewRating};

use crate::clock::Clock;
use crate::persistence::{StateRepository, StorageKey, StoreName, load_state, persist_state};

/// Business-rule violations surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("{author} has already reviewed {item_id}")]
    DuplicateReview { author: IdentityId, item_id: ItemId },

    #[error("review not found: {0}")]
    NotFound(ReviewId),

    #[error("{identity} is not the author of review {review_id}")]
    NotAuthorized {
        review_id: ReviewId,
        identity: IdentityId,
    },

    #[error("{identity} already liked review {review_id}")]
    AlreadyLiked {
        review_id: ReviewId,
        identity: IdentityId,
    },

    #[error("{identity} has not liked review {review_id}")]
    NotLiked {
        review_id: ReviewId,
        identity: IdentityId,
    },
}

/// Aggregate rating of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingSummary {
    pub count: usize,
    /// Mean star rating, `None` when there are no reviews.
    pub average: Option<Decimal>,
}

impl std::fmt::Display for RatingSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.average {
            Some(avg) => write!(f, "{:.1} ({} reviews)", avg.round_dp(1), self.count),
            None => f.write_str("no reviews yet"),
        }
    }
}

/// All reviews, with the rules for changing them.
pub struct ReviewAggregator {
    reviews: Vec<Review>,
    key: StorageKey,
    repository: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReviewAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewAggregator")
            .field("reviews", &self.reviews.len())
            .finish_non_exhaustive()
    }
}

impl ReviewAggregator {
    /// Load the global review collection.
    #[must_use]
    pub fn load(repository: Arc<dyn StateRepository>, clock: Arc<dyn Clock>) -> Self {
        let key = StorageKey::global(StoreName::Reviews);
        let reviews: Vec<Review> = load_state(repository.as_ref(), &key);
        tracing::debug!(reviews = reviews.len(), "Loaded reviews");
        Self {
            reviews,
            key,
            repository,
            clock,
        }
    }

    /// Submit a new review.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::DuplicateReview` if `author` already reviewed `item_id`.
    #[instrument(skip_all, fields(author = %author, item_id = %item_id))]
    pub fn add_review(
        &mut self,
        author: &IdentityId,
        item_id: &ItemId,
        rating: ReviewRating,
        body: impl Into<String>,
    ) -> Result<Review, ReviewError> {
        if self.has_reviewed(author, item_id) {
            return Err(ReviewError::DuplicateReview {
                author: author.clone(),
                item_id: item_id.clone(),
            });
        }

        let now = self.clock.now();
        let review = Review {
            id: ReviewId::generate(),
            author: author.clone(),
            item_id: item_id.clone(),
            rating,
            body: body.into(),
            created_at: now,
            updated_at: now,
            likes: 0,
            liked_by: BTreeSet::new(),
        };
        self.reviews.push(review.clone());
        self.persist();
        tracing::info!(review_id = %review.id, "Review added");
        Ok(review)
    }

    /// Apply an author's edit and refresh the timestamp.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` for unknown ids and
    /// `ReviewError::NotAuthorized` if `author` did not write the review.
    pub fn update_review(
        &mut self,
        review_id: ReviewId,
        author: &IdentityId,
        patch: ReviewPatch,
    ) -> Result<Review, ReviewError> {
        let index = self.authored_index(review_id, author)?;
        let now = self.clock.now();
        let review = self
            .reviews
            .get_mut(index)
            .ok_or(ReviewError::NotFound(review_id))?;
        if let Some(rating) = patch.rating {
            review.rating = rating;
        }
        if let Some(body) = patch.body {
            review.body = body;
        }
        review.updated_at = now;
        let updated = review.clone();

        self.persist();
        tracing::debug!(review_id = %review_id, "Review updated");
        Ok(updated)
    }

    /// Delete an author's review.
    ///
    /// # Errors
    ///
    /// Same rules as [`Self::update_review`].
    pub fn delete_review(
        &mut self,
        review_id: ReviewId,
        author: &IdentityId,
    ) -> Result<Review, ReviewError> {
        let index = self.authored_index(review_id, author)?;
        let removed = self.reviews.remove(index);
        self.persist();
        tracing::debug!(review_id = %review_id, "Review deleted");
        Ok(removed)
    }

    /// Like a review once per identity.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` for unknown ids and
    /// `ReviewError::AlreadyLiked` if `liker` already liked it.
    pub fn like_review(
        &mut self,
        review_id: ReviewId,
        liker: &IdentityId,
    ) -> Result<Review, ReviewError> {
        let review = self.review_mut(review_id)?;
        if !review.liked_by.insert(liker.clone()) {
            return Err(ReviewError::AlreadyLiked {
                review_id,
                identity: liker.clone(),
            });
        }
        review.likes = review.likes.saturating_add(1);
        let liked = review.clone();

        self.persist();
        Ok(liked)
    }

    /// Withdraw a like. The like count never drops below zero.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::NotFound` for unknown ids and
    /// `ReviewError::NotLiked` if `liker` has not liked it.
    pub fn unlike_review(
        &mut self,
        review_id: ReviewId,
        liker: &IdentityId,
    ) -> Result<Review, ReviewError> {
        let review = self.review_mut(review_id)?;
        if !review.liked_by.remove(liker) {
            return Err(ReviewError::NotLiked {
                review_id,
                identity: liker.clone(),
            });
        }
        review.likes = review.likes.saturating_sub(1);
        let unliked = review.clone();

        self.persist();
        Ok(unliked)
    }

    /// Reviews of `item_id`, newest first.
    #[must_use]
    pub fn reviews_for_item(&self, item_id: &ItemId) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|review| &review.item_id == item_id)
            .collect();
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        reviews
    }

    /// Reviews written by `author`, newest first.
    #[must_use]
    pub fn reviews_by_author(&self, author: &IdentityId) -> Vec<&Review> {
        let mut reviews: Vec<&Review> = self
            .reviews
            .iter()
            .filter(|review| &review.author == author)
            .collect();
        reviews.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        reviews
    }

    #[must_use]
    pub fn has_reviewed(&self, author: &IdentityId, item_id: &ItemId) -> bool {
        self.review_by_author_for_item(author, item_id).is_some()
    }

    #[must_use]
    pub fn review_by_author_for_item(
        &self,
        author: &IdentityId,
        item_id: &ItemId,
    ) -> Option<&Review> {
        self.reviews
            .iter()
            .find(|review| &review.author == author && &review.item_id == item_id)
    }

    #[must_use]
    pub fn get(&self, review_id: ReviewId) -> Option<&Review> {
        self.reviews.iter().find(|review| review.id == review_id)
    }

    /// Count and mean rating for `item_id`.
    #[must_use]
    pub fn rating_summary(&self, item_id: &ItemId) -> RatingSummary {
        let (count, stars) = self
            .reviews
            .iter()
            .filter(|review| &review.item_id == item_id)
            .fold((0_usize, 0_u64), |(count, stars), review| {
                (count + 1, stars + u64::from(review.rating.stars()))
            });
        let average = (count > 0).then(|| Decimal::from(stars) / Decimal::from(count));
        RatingSummary { count, average }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    fn review_mut(&mut self, review_id: ReviewId) -> Result<&mut Review, ReviewError> {
        self.reviews
            .iter_mut()
            .find(|review| review.id == review_id)
            .ok_or(ReviewError::NotFound(review_id))
    }

    fn index_of(&self, review_id: ReviewId) -> Result<usize, ReviewError> {
        self.reviews
            .iter()
            .position(|review| review.id == review_id)
            .ok_or(ReviewError::NotFound(review_id))
    }

    fn authored_index(
        &self,
        review_id: ReviewId,
        author: &IdentityId,
    ) -> Result<usize, ReviewError> {
        let index = self.index_of(review_id)?;
        match self.reviews.get(index) {
            Some(review) if &review.author == author => Ok(index),
            Some(_) => Err(ReviewError::NotAuthorized {
                review_id,
                identity: author.clone(),
            }),
            None => Err(ReviewError::NotFound(review_id)),
        }
    }

    fn persist(&self) {
        persist_state(self.repository.as_ref(), &self.key, &self.reviews);
    }
}
