//! Catalog reference data.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DiscountPercent, ItemId, Price};

/// What kind of digital good a catalog item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    #[default]
    Game,
    WalletTopUp,
    Subscription,
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Game => write!(f, "game"),
            Self::WalletTopUp => write!(f, "wallet_top_up"),
            Self::Subscription => write!(f, "subscription"),
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "game" => Ok(Self::Game),
            "wallet_top_up" => Ok(Self::WalletTopUp),
            "subscription" => Ok(Self::Subscription),
            _ => Err(format!("invalid product kind: {s}")),
        }
    }
}

/// A purchasable catalog entry.
///
/// Immutable reference data: created when the catalog is loaded and never
/// mutated by the storefront engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub title: String,
    pub price: Price,
    #[serde(default)]
    pub discount_percent: DiscountPercent,
    #[serde(default)]
    pub genres: BTreeSet<String>,
    #[serde(default)]
    pub platforms: BTreeSet<String>,
    #[serde(default)]
    pub rating: Option<Decimal>,
    #[serde(default)]
    pub kind: ProductKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CatalogItem {
    /// Create an item with no tags, discount or rating.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            discount_percent: DiscountPercent::ZERO,
            genres: BTreeSet::new(),
            platforms: BTreeSet::new(),
            rating: None,
            kind: ProductKind::Game,
            description: None,
        }
    }

    /// Builder-style discount setter.
    #[must_use]
    pub const fn with_discount(mut self, discount: DiscountPercent) -> Self {
        self.discount_percent = discount;
        self
    }

    /// Builder-style rating setter.
    #[must_use]
    pub const fn with_rating(mut self, rating: Decimal) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Builder-style genre tags setter.
    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style platform tags setter.
    #[must_use]
    pub fn with_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.platforms = platforms.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style kind setter.
    #[must_use]
    pub const fn with_kind(mut self, kind: ProductKind) -> Self {
        self.kind = kind;
        self
    }

    /// All descriptive tags: genres and platforms combined.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.genres.union(&self.platforms).map(String::as_str)
    }

    /// Number of tags this item shares with `other`.
    #[must_use]
    pub fn shared_tag_count(&self, other: &Self) -> usize {
        let theirs: BTreeSet<&str> = other.tags().collect();
        self.tags().filter(|tag| theirs.contains(tag)).count()
    }

    /// The per-unit discount amount.
    #[must_use]
    pub fn unit_discount(&self) -> Decimal {
        self.discount_percent.fraction() * self.price.amount()
    }

    /// The per-unit price after discount, unrounded.
    #[must_use]
    pub fn discounted_price(&self) -> Decimal {
        self.price.amount() - self.unit_discount()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str) -> CatalogItem {
        CatalogItem::new(id, id.to_uppercase(), Price::from_cents(2000).unwrap())
    }

    #[test]
    fn test_tags_are_genre_platform_union() {
        let a = item("a")
            .with_genres(["rpg", "pc"])
            .with_platforms(["pc", "ps5"]);
        let tags: Vec<&str> = a.tags().collect();
        assert_eq!(tags, vec!["pc", "ps5", "rpg"]);
    }

    #[test]
    fn test_shared_tag_count() {
        let a = item("a").with_genres(["rpg", "action"]).with_platforms(["pc"]);
        let b = item("b").with_genres(["rpg"]).with_platforms(["pc", "xbox"]);
        let c = item("c").with_genres(["puzzle"]);
        assert_eq!(a.shared_tag_count(&b), 2);
        assert_eq!(a.shared_tag_count(&c), 0);
    }

    #[test]
    fn test_discounted_price() {
        let a = item("a").with_discount(DiscountPercent::new(Decimal::new(25, 0)).unwrap());
        assert_eq!(a.unit_discount(), Decimal::new(5, 0));
        assert_eq!(a.discounted_price(), Decimal::new(15, 0));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": "top-up-10", "title": "Wallet $10", "price": "10.00", "kind": "wallet_top_up"}"#;
        let parsed: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.kind, ProductKind::WalletTopUp);
        assert!(parsed.discount_percent.is_zero());
        assert!(parsed.rating.is_none());
        assert_eq!(parsed.tags().count(), 0);
    }
}
