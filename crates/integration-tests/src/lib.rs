//! Integration tests for Zafago.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p zafago-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart mutations, totals and persistence
//! - `recently_viewed` - View history ordering and cap
//! - `recommendations` - Recommendation bounds and reproducibility
//! - `reviews` - Authorship, duplicate and like rules
//! - `session` - Identity switching, checkout and randomized operation sequences
//!
//! This crate holds the shared fixtures. Everything runs in-process against
//! in-memory or temp-dir repositories; no services are required.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use zafago_core::{CatalogItem, DiscountPercent, Identity, Price};
use zafago_storefront::catalog::CatalogFormat;
use zafago_storefront::{
    CatalogIndex, Clock, MemoryStateRepository, ShopperSession, StateRepository,
};

/// Catalog used across the integration suites.
pub const FIXTURE_CATALOG: &str = r#"
- id: elden-ring
  title: Elden Ring
  price: "59.99"
  genres: [rpg, souls-like, action]
  platforms: [pc, ps5]
  rating: "4.8"
- id: dark-souls
  title: Dark Souls
  price: "39.99"
  discount_percent: "50"
  genres: [rpg, souls-like]
  platforms: [pc, ps5]
  rating: "4.6"
- id: hollow-knight
  title: Hollow Knight
  price: "14.99"
  genres: [souls-like, metroidvania, action]
  platforms: [pc, switch]
  rating: "4.7"
- id: forza
  title: Forza Horizon
  price: "69.99"
  genres: [racing]
  platforms: [pc, xbox]
  rating: "4.4"
- id: gran-turismo
  title: Gran Turismo
  price: "69.99"
  genres: [racing, simulation]
  platforms: [ps5]
  rating: "4.5"
- id: stardew
  title: Stardew Valley
  price: "14.99"
  genres: [simulation, farming]
  platforms: [pc, switch]
  rating: "4.9"
- id: top-up-25
  title: Wallet Top-Up 25
  price: "25.00"
  kind: wallet_top_up
"#;

/// Parse [`FIXTURE_CATALOG`].
#[must_use]
pub fn fixture_catalog() -> Arc<CatalogIndex> {
    Arc::new(CatalogIndex::parse(FIXTURE_CATALOG, CatalogFormat::Yaml).unwrap())
}

/// An undiscounted, untagged item priced in cents.
#[must_use]
pub fn plain_item(id: &str, cents: i64) -> CatalogItem {
    CatalogItem::new(id, id.to_uppercase(), Price::from_cents(cents).unwrap())
}

/// `plain_item` with a whole-percent discount.
#[must_use]
pub fn discounted_item(id: &str, cents: i64, percent: i64) -> CatalogItem {
    plain_item(id, cents).with_discount(DiscountPercent::new(Decimal::from(percent)).unwrap())
}

/// Parse a decimal literal.
#[must_use]
pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// A clock that advances one second per reading.
pub struct TestClock {
    seconds: AtomicI64,
}

impl TestClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seconds: AtomicI64::new(0),
        }
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        let offset = self.seconds.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap() + Duration::seconds(offset)
    }
}

/// A session over the fixture catalog and an in-memory repository.
#[must_use]
pub fn memory_session(identity: Identity) -> (ShopperSession, Arc<dyn StateRepository>) {
    let repository: Arc<dyn StateRepository> = Arc::new(MemoryStateRepository::new());
    let session = ShopperSession::open(
        fixture_catalog(),
        Arc::clone(&repository),
        Arc::new(TestClock::new()),
        identity,
    );
    (session, repository)
}
