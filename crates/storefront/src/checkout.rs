//! Simulated checkout.
//!
//! No payment is taken. Checkout prices the cart, issues one mock product
//! key per purchased unit, and clears the cart once the receipt exists.

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use zafago_core::{Identity, ItemId, OrderId};

use crate::cart::{CartStore, CartTotals};
use crate::catalog::CatalogProvider;
use crate::clock::Clock;

const KEY_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const KEY_GROUPS: usize = 4;
const KEY_GROUP_LEN: usize = 5;

/// Reasons a checkout cannot complete. The cart is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("cart item is no longer sold: {0}")]
    UnknownItem(ItemId),
}

/// One purchased line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub item_id: ItemId,
    pub title: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub unit_discount: Decimal,
    pub line_total: Decimal,
    pub product_keys: Vec<String>,
}

/// Proof of a completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub identity: Identity,
    pub placed_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
    pub totals: CartTotals,
}

/// Complete checkout for the contents of `cart`.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart and
/// `CheckoutError::UnknownItem` if a line no longer resolves in the catalog.
#[instrument(skip_all, fields(identity = %cart.identity()))]
pub fn checkout<R: Rng + ?Sized>(
    cart: &mut CartStore,
    catalog: &dyn CatalogProvider,
    rng: &mut R,
    clock: &dyn Clock,
) -> Result<OrderReceipt, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut lines = Vec::with_capacity(cart.lines().len());
    for line in cart.lines() {
        let item = catalog
            .get(&line.item_id)
            .ok_or_else(|| CheckoutError::UnknownItem(line.item_id.clone()))?;
        let quantity = Decimal::from(line.quantity);
        lines.push(OrderLine {
            item_id: item.id.clone(),
            title: item.title.clone(),
            quantity: line.quantity,
            unit_price: item.price.amount(),
            unit_discount: item.unit_discount(),
            line_total: item.discounted_price() * quantity,
            product_keys: (0..line.quantity).map(|_| product_key(rng)).collect(),
        });
    }

    let receipt = OrderReceipt {
        order_id: OrderId::generate(),
        identity: cart.identity().clone(),
        placed_at: clock.now(),
        lines,
        totals: cart.totals(catalog),
    };

    cart.clear();
    tracing::info!(
        order_id = %receipt.order_id,
        total = %receipt.totals.total,
        "Checkout completed"
    );
    Ok(receipt)
}

/// A mock product key such as `7KQ2M-XH3PA-9TZ4N-B8RWC`.
fn product_key<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut key = String::with_capacity(KEY_GROUPS * (KEY_GROUP_LEN + 1));
    for group in 0..KEY_GROUPS {
        if group > 0 {
            key.push('-');
        }
        for _ in 0..KEY_GROUP_LEN {
            let byte = KEY_ALPHABET.choose(rng).copied().unwrap_or(b'X');
            key.push(char::from(byte));
        }
    }
    key
}
