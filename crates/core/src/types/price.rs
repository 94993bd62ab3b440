//! Type-safe money values using decimal arithmetic.
//!
//! Stored amounts keep full precision. Rounding to two decimal places only
//! happens in [`Price::display`] and [`format_money`], at presentation time.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`] or [`DiscountPercent`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices are never negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// Discounts are percentages in `0..=100`.
    #[error("discount must be between 0 and 100 percent (got {0})")]
    DiscountOutOfRange(Decimal),
}

/// A non-negative price in the store currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `cents` is below zero.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_money(self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

/// A percentage discount between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountPercent(Decimal);

impl DiscountPercent {
    /// No discount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new discount percentage.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::DiscountOutOfRange` unless `0 <= percent <= 100`.
    pub fn new(percent: Decimal) -> Result<Self, PriceError> {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PriceError::DiscountOutOfRange(percent));
        }
        Ok(Self(percent))
    }

    /// The percentage value, e.g. `25` for 25%.
    #[must_use]
    pub const fn percent(&self) -> Decimal {
        self.0
    }

    /// The discount as a fraction of the price, e.g. `0.25` for 25%.
    #[must_use]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Whether any discount applies.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl TryFrom<Decimal> for DiscountPercent {
    type Error = PriceError;

    fn try_from(percent: Decimal) -> Result<Self, Self::Error> {
        Self::new(percent)
    }
}

impl From<DiscountPercent> for Decimal {
    fn from(discount: DiscountPercent) -> Self {
        discount.0
    }
}

/// Round a monetary amount half-away-from-zero and format it as dollars.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${rounded:.2}")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_price_rejects_negative() {
        assert_eq!(
            Price::new(dec("-0.01")),
            Err(PriceError::Negative(dec("-0.01")))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_price_display_rounds_at_presentation() {
        let price = Price::new(dec("19.995")).unwrap();
        assert_eq!(price.amount(), dec("19.995"));
        assert_eq!(price.display(), "$20.00");
        assert_eq!(Price::from_cents(1000).unwrap().display(), "$10.00");
    }

    #[test]
    fn test_discount_range() {
        assert!(DiscountPercent::new(dec("0")).is_ok());
        assert!(DiscountPercent::new(dec("100")).is_ok());
        assert!(DiscountPercent::new(dec("100.5")).is_err());
        assert!(DiscountPercent::new(dec("-1")).is_err());
        assert_eq!(DiscountPercent::new(dec("25")).unwrap().fraction(), dec("0.25"));
    }

    #[test]
    fn test_serde_rejects_invalid_values() {
        assert!(serde_json::from_str::<Price>("\"-5\"").is_err());
        assert!(serde_json::from_str::<DiscountPercent>("\"150\"").is_err());
        let price: Price = serde_json::from_str("\"59.99\"").unwrap();
        assert_eq!(price.amount(), dec("59.99"));
    }
}
