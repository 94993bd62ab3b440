//! One shopper's view of the storefront.
//!
//! A session owns the per-identity stores and shares the catalog, the state
//! repository and the clock with every other session in the process.

use std::sync::Arc;

use rand::Rng;

use zafago_core::{CatalogItem, Identity, ItemId};

use crate::cart::CartStore;
use crate::catalog::{CatalogIndex, CatalogProvider};
use crate::checkout::{CheckoutError, OrderReceipt, checkout};
use crate::clock::Clock;
use crate::persistence::StateRepository;
use crate::recently_viewed::RecentlyViewedTracker;
use crate::recommendations::RecommendationEngine;
use crate::wishlist::WishlistStore;

/// Per-identity stores plus shared reference data.
pub struct ShopperSession {
    catalog: Arc<CatalogIndex>,
    repository: Arc<dyn StateRepository>,
    clock: Arc<dyn Clock>,
    identity: Identity,
    cart: CartStore,
    viewed: RecentlyViewedTracker,
    wishlist: WishlistStore,
}

impl std::fmt::Debug for ShopperSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopperSession")
            .field("identity", &self.identity)
            .field("cart", &self.cart)
            .field("viewed", &self.viewed)
            .field("wishlist", &self.wishlist)
            .finish_non_exhaustive()
    }
}

impl ShopperSession {
    /// Open a session for `identity`, loading its stored state.
    #[must_use]
    pub fn open(
        catalog: Arc<CatalogIndex>,
        repository: Arc<dyn StateRepository>,
        clock: Arc<dyn Clock>,
        identity: Identity,
    ) -> Self {
        tracing::debug!(identity = %identity, "Opening shopper session");
        Self {
            cart: CartStore::load(identity.clone(), Arc::clone(&repository)),
            viewed: RecentlyViewedTracker::load(identity.clone(), Arc::clone(&repository)),
            wishlist: WishlistStore::load(identity.clone(), Arc::clone(&repository)),
            catalog,
            repository,
            clock,
            identity,
        }
    }

    /// Sign in, sign out, or change user.
    ///
    /// Every per-identity store is swapped for the new identity's state.
    /// The previous identity's state stays in the repository untouched.
    pub fn switch_identity(&mut self, identity: Identity) {
        if identity == self.identity {
            return;
        }
        tracing::info!(from = %self.identity, to = %identity, "Switching identity");
        self.cart.switch_identity(identity.clone());
        self.viewed.switch_identity(identity.clone());
        self.wishlist.switch_identity(identity.clone());
        self.identity = identity;
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    #[must_use]
    pub fn repository(&self) -> &Arc<dyn StateRepository> {
        &self.repository
    }

    #[must_use]
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn recently_viewed(&self) -> &RecentlyViewedTracker {
        &self.viewed
    }

    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }

    /// Resolve `id` and record it as viewed.
    pub fn view_item(&mut self, id: &ItemId) -> Option<&CatalogItem> {
        let item = self.catalog.get(id)?;
        self.viewed.record_view(self.catalog.as_ref(), id);
        Some(item)
    }

    /// Record a view without resolving the item.
    pub fn record_view(&mut self, id: &ItemId) {
        self.viewed.record_view(self.catalog.as_ref(), id);
    }

    /// Add one unit of `id` to the cart. Returns whether the item exists.
    pub fn add_to_cart(&mut self, id: &ItemId) -> bool {
        let Some(item) = self.catalog.get(id) else {
            tracing::debug!(item_id = %id, "Ignoring add of unknown item");
            return false;
        };
        self.cart.add_item(item);
        true
    }

    /// Save `id` for later. Returns whether it was newly added.
    pub fn add_to_wishlist(&mut self, id: &ItemId) -> bool {
        self.wishlist.add(self.catalog.as_ref(), id)
    }

    /// Flip wishlist membership of `id`. Returns whether it is now wishlisted.
    pub fn toggle_wishlist(&mut self, id: &ItemId) -> bool {
        self.wishlist.toggle(self.catalog.as_ref(), id)
    }

    pub fn clear_recently_viewed(&mut self) {
        self.viewed.clear();
    }

    /// Move a wishlisted item into the cart.
    pub fn move_to_cart(&mut self, id: &ItemId) -> bool {
        self.wishlist.move_to_cart(id, &mut self.cart, self.catalog.as_ref())
    }

    /// Personalized recommendations for this shopper.
    pub fn recommendations<R: Rng>(
        &self,
        limit: usize,
        engine: &mut RecommendationEngine<R>,
    ) -> Vec<&CatalogItem> {
        engine.personalized(limit, self.catalog.as_ref(), &self.viewed, &self.cart)
    }

    /// Check out the current cart.
    ///
    /// # Errors
    ///
    /// See [`checkout`].
    pub fn checkout<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<OrderReceipt, CheckoutError> {
        checkout(&mut self.cart, self.catalog.as_ref(), rng, self.clock.as_ref())
    }
}
