//! Zafago Storefront engine.
//!
//! The client-state core of the storefront: everything a shopper's session
//! mutates between page views, expressed as explicit store objects.
//!
//! # Architecture
//!
//! - [`catalog`] - Read-only, process-wide catalog index and similarity lookup
//! - [`cart`] - Per-identity shopping cart with decimal totals
//! - [`recently_viewed`] - Bounded most-recent-first view history
//! - [`wishlist`] - Per-identity saved-for-later list
//! - [`recommendations`] - Personalized ranking composed from the above
//! - [`reviews`] - Global review collection with authorship and like rules
//! - [`checkout`] - Simulated checkout that issues product keys
//! - [`session`] - Bundles the per-identity stores for one shopper
//!
//! Every store persists through the [`persistence::StateRepository`] trait
//! after each mutation. Loading is lenient (corrupt state starts empty) and
//! saving is best-effort (failures are logged, in-memory state wins).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod clock;
pub mod error;
pub mod persistence;
pub mod recently_viewed;
pub mod recommendations;
pub mod reviews;
pub mod session;
pub mod wishlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use cart::{CartLine, CartStore, CartTotals, MAX_LINE_QUANTITY};
pub use catalog::{CatalogError, CatalogIndex, CatalogProvider};
pub use checkout::{CheckoutError, OrderReceipt, checkout};
pub use clock::{Clock, SystemClock};
pub use error::{Result, StorefrontError};
pub use persistence::{
    FileStateRepository, MemoryStateRepository, RepositoryError, StateRepository, StorageKey,
    StoreName,
};
pub use recently_viewed::{RECENTLY_VIEWED_CAP, RecentlyViewedTracker};
pub use recommendations::RecommendationEngine;
pub use reviews::{RatingSummary, ReviewAggregator, ReviewError};
pub use session::ShopperSession;
pub use wishlist::WishlistStore;
