//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use zafago_core::{CatalogItem, DiscountPercent, Price};

use crate::catalog::CatalogIndex;
use crate::clock::Clock;
use crate::persistence::{RepositoryError, StateRepository, StorageKey};

/// A repository whose every operation fails.
pub struct FailingRepository;

impl StateRepository for FailingRepository {
    fn load(&self, _key: &StorageKey) -> Result<Option<String>, RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }

    fn save(&self, _key: &StorageKey, _blob: &str) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }

    fn remove(&self, _key: &StorageKey) -> Result<(), RepositoryError> {
        Err(RepositoryError::Io(std::io::Error::other("disk on fire")))
    }
}

/// A clock that advances one minute per reading.
pub struct SteppingClock {
    minutes: AtomicI64,
}

impl SteppingClock {
    pub const fn new() -> Self {
        Self {
            minutes: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let minutes = self.minutes.fetch_add(1, Ordering::SeqCst);
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }
}

pub fn item(id: &str, cents: i64) -> CatalogItem {
    CatalogItem::new(id, id.to_uppercase(), Price::from_cents(cents).unwrap())
}

pub fn discount(percent: i64) -> DiscountPercent {
    DiscountPercent::new(Decimal::new(percent, 0)).unwrap()
}

pub fn rating(tenths: i64) -> Decimal {
    Decimal::new(tenths, 1)
}

/// A small catalog with overlapping tags.
///
/// - `elden-ring`, `dark-souls`, `hollow-knight`: souls-like action RPGs
/// - `forza`, `gran-turismo`: racing
/// - `stardew`: farming sim on pc and switch
/// - `top-up-25`: untagged wallet credit
pub fn sample_catalog() -> Arc<CatalogIndex> {
    let items = vec![
        item("elden-ring", 5999)
            .with_genres(["rpg", "souls-like", "action"])
            .with_platforms(["pc", "ps5"])
            .with_rating(rating(48)),
        item("dark-souls", 3999)
            .with_genres(["rpg", "souls-like"])
            .with_platforms(["pc", "ps5"])
            .with_rating(rating(46))
            .with_discount(discount(50)),
        item("hollow-knight", 1499)
            .with_genres(["souls-like", "metroidvania", "action"])
            .with_platforms(["pc", "switch"])
            .with_rating(rating(47)),
        item("forza", 6999)
            .with_genres(["racing"])
            .with_platforms(["pc", "xbox"])
            .with_rating(rating(44)),
        item("gran-turismo", 6999)
            .with_genres(["racing", "simulation"])
            .with_platforms(["ps5"])
            .with_rating(rating(45)),
        item("stardew", 1499)
            .with_genres(["simulation", "farming"])
            .with_platforms(["pc", "switch"])
            .with_rating(rating(49)),
        item("top-up-25", 2500).with_kind(zafago_core::ProductKind::WalletTopUp),
    ];
    Arc::new(CatalogIndex::new(items).unwrap())
}
