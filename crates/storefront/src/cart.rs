//! Per-identity shopping cart.
//!
//! The cart holds at most one line per catalog item. Quantities stay within
//! `1..=MAX_LINE_QUANTITY`: decrementing to zero or below clamps to one, and
//! only an explicit [`CartStore::remove_item`] (or [`CartStore::clear`])
//! takes a line out. Every mutation is persisted immediately through the
//! repository.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use zafago_core::price::format_money;
use zafago_core::{CatalogItem, Identity, ItemId};

use crate::catalog::CatalogProvider;
use crate::persistence::{StateRepository, StorageKey, StoreName, load_state, persist_state};

/// Upper bound on the quantity of a single line.
pub const MAX_LINE_QUANTITY: u32 = 99;

/// One cart entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: ItemId,
    pub quantity: u32,
}

impl CartLine {
    #[must_use]
    pub fn new(item_id: impl Into<ItemId>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity: quantity.max(1),
        }
    }
}

/// Derived cart totals, unrounded.
///
/// `total == subtotal - discount` holds exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// Subtotal rounded for display.
    #[must_use]
    pub fn subtotal_display(&self) -> String {
        format_money(self.subtotal)
    }

    /// Discount rounded for display.
    #[must_use]
    pub fn discount_display(&self) -> String {
        format_money(self.discount)
    }

    /// Total rounded for display.
    #[must_use]
    pub fn total_display(&self) -> String {
        format_money(self.total)
    }
}

impl std::fmt::Display for CartTotals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "subtotal {}, discount {}, total {}",
            self.subtotal_display(),
            self.discount_display(),
            self.total_display()
        )
    }
}

/// The cart of one identity.
pub struct CartStore {
    identity: Identity,
    key: StorageKey,
    lines: Vec<CartLine>,
    repository: Arc<dyn StateRepository>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("identity", &self.identity)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart for `identity`, starting empty if nothing usable is stored.
    #[must_use]
    pub fn load(identity: Identity, repository: Arc<dyn StateRepository>) -> Self {
        let key = StorageKey::scoped(&identity, StoreName::Cart);
        let stored: Vec<CartLine> = load_state(repository.as_ref(), &key);
        let lines = normalize(stored);
        tracing::debug!(identity = %identity, lines = lines.len(), "Loaded cart");
        Self {
            identity,
            key,
            lines,
            repository,
        }
    }

    /// The identity this cart belongs to.
    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Swap in another identity's cart. Carts are never merged.
    pub fn switch_identity(&mut self, identity: Identity) {
        if identity == self.identity {
            return;
        }
        *self = Self::load(identity, Arc::clone(&self.repository));
    }

    /// Add one unit of `item`, creating the line if needed.
    pub fn add_item(&mut self, item: &CatalogItem) {
        match self.line_mut(&item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1).min(MAX_LINE_QUANTITY),
            None => self.lines.push(CartLine::new(item.id.clone(), 1)),
        }
        tracing::debug!(item_id = %item.id, "Added item to cart");
        self.persist();
    }

    /// Remove the line for `id`. Absent ids are ignored.
    pub fn remove_item(&mut self, id: &ItemId) {
        let before = self.lines.len();
        self.lines.retain(|line| &line.item_id != id);
        if self.lines.len() != before {
            tracing::debug!(item_id = %id, "Removed item from cart");
            self.persist();
        }
    }

    /// Set the quantity of an existing line, clamped to `1..=MAX_LINE_QUANTITY`.
    ///
    /// Does not create a line for an absent id.
    pub fn set_quantity(&mut self, id: &ItemId, quantity: i64) {
        let clamped = u32::try_from(quantity.clamp(1, i64::from(MAX_LINE_QUANTITY)))
            .unwrap_or(MAX_LINE_QUANTITY);
        let Some(line) = self.line_mut(id) else {
            tracing::debug!(item_id = %id, "Ignoring quantity update for item not in cart");
            return;
        };
        line.quantity = clamped;
        tracing::debug!(item_id = %id, quantity = clamped, "Updated cart quantity");
        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        tracing::debug!(identity = %self.identity, "Cleared cart");
        self.persist();
    }

    /// Replace the cart with a saved set of lines.
    ///
    /// Duplicate ids are merged and quantities clamped to `1..=MAX_LINE_QUANTITY`.
    pub fn restore(&mut self, lines: Vec<CartLine>) {
        self.lines = normalize(lines);
        tracing::debug!(lines = self.lines.len(), "Restored saved cart");
        self.persist();
    }

    /// Whether `id` is in the cart.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.lines.iter().any(|line| &line.item_id == id)
    }

    /// Quantity of `id`, or zero.
    #[must_use]
    pub fn quantity_of(&self, id: &ItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.item_id == id)
            .map_or(0, |line| line.quantity)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Compute totals against current catalog prices.
    ///
    /// Lines whose item has left the catalog contribute nothing.
    #[must_use]
    pub fn totals(&self, catalog: &dyn CatalogProvider) -> CartTotals {
        let mut totals = CartTotals::default();
        for line in &self.lines {
            let Some(item) = catalog.get(&line.item_id) else {
                tracing::warn!(item_id = %line.item_id, "Cart references unknown catalog item");
                continue;
            };
            let quantity = Decimal::from(line.quantity);
            totals.subtotal += item.price.amount() * quantity;
            totals.discount += item.unit_discount() * quantity;
        }
        totals.total = totals.subtotal - totals.discount;
        totals
    }

    fn line_mut(&mut self, id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item_id == id)
    }

    fn persist(&self) {
        persist_state(self.repository.as_ref(), &self.key, &self.lines);
    }
}

/// Merge duplicate ids (keeping first position) and clamp quantities.
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        let quantity = line.quantity.clamp(1, MAX_LINE_QUANTITY);
        match merged.iter_mut().find(|m| m.item_id == line.item_id) {
            Some(existing) => {
                let summed = existing.quantity.saturating_add(quantity);
                existing.quantity = summed.min(MAX_LINE_QUANTITY);
            }
            None => merged.push(CartLine {
                item_id: line.item_id,
                quantity,
            }),
        }
    }
    merged
}
