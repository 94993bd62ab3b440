//! Core types for Zafago.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod catalog;
pub mod id;
pub mod identity;
pub mod price;
pub mod review;

pub use catalog::{CatalogItem, ProductKind};
pub use id::*;
pub use identity::Identity;
pub use price::{DiscountPercent, Price, PriceError};
pub use review::{RatingError, Review, ReviewPatch, ReviewRating};
