//! Unified error handling.
//!
//! Each store reports its own error type. `StorefrontError` wraps them so
//! callers driving a whole session can use a single `Result`.

use thiserror::Error;

use zafago_core::{PriceError, RatingError};

use crate::catalog::CatalogError;
use crate::checkout::CheckoutError;
use crate::persistence::RepositoryError;
use crate::reviews::ReviewError;

/// Storefront-level error type.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Catalog could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// State repository operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// A review operation was rejected.
    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    /// Checkout could not complete.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Rating outside the accepted range.
    #[error("Invalid rating: {0}")]
    Rating(#[from] RatingError),

    /// Invalid price or discount.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),
}

impl StorefrontError {
    /// Whether the shopper can fix this by changing their input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Catalog(_) | Self::Storage(_))
    }
}

/// Result alias for storefront operations.
pub type Result<T> = std::result::Result<T, StorefrontError>;
