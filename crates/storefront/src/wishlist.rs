//! Per-identity wishlist: items saved for later, in the order they were added.

use std::sync::Arc;

use zafago_core::{CatalogItem, Identity, ItemId};

use crate::cart::CartStore;
use crate::catalog::CatalogProvider;
use crate::persistence::{StateRepository, StorageKey, StoreName, load_state, persist_state};

/// The wishlist of one identity.
pub struct WishlistStore {
    identity: Identity,
    key: StorageKey,
    ids: Vec<ItemId>,
    repository: Arc<dyn StateRepository>,
}

impl std::fmt::Debug for WishlistStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WishlistStore")
            .field("identity", &self.identity)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl WishlistStore {
    #[must_use]
    pub fn load(identity: Identity, repository: Arc<dyn StateRepository>) -> Self {
        let key = StorageKey::scoped(&identity, StoreName::Wishlist);
        let mut ids: Vec<ItemId> = load_state(repository.as_ref(), &key);
        let mut seen = std::collections::HashSet::new();
        ids.retain(|id| seen.insert(id.clone()));
        Self {
            identity,
            key,
            ids,
            repository,
        }
    }

    pub fn switch_identity(&mut self, identity: Identity) {
        if identity == self.identity {
            return;
        }
        *self = Self::load(identity, Arc::clone(&self.repository));
    }

    /// Save `id` for later. Returns whether it was newly added.
    pub fn add(&mut self, catalog: &dyn CatalogProvider, id: &ItemId) -> bool {
        if !catalog.contains(id) || self.contains(id) {
            return false;
        }
        self.ids.push(id.clone());
        tracing::debug!(item_id = %id, "Added item to wishlist");
        self.persist();
        true
    }

    /// Returns whether `id` was present.
    pub fn remove(&mut self, id: &ItemId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| existing != id);
        let removed = self.ids.len() != before;
        if removed {
            tracing::debug!(item_id = %id, "Removed item from wishlist");
            self.persist();
        }
        removed
    }

    /// Flip membership of `id`. Returns whether it is now wishlisted.
    pub fn toggle(&mut self, catalog: &dyn CatalogProvider, id: &ItemId) -> bool {
        if self.remove(id) {
            false
        } else {
            self.add(catalog, id)
        }
    }

    /// Move `id` from the wishlist into `cart`. Returns whether it moved.
    pub fn move_to_cart(
        &mut self,
        id: &ItemId,
        cart: &mut CartStore,
        catalog: &dyn CatalogProvider,
    ) -> bool {
        let Some(item) = catalog.get(id) else {
            return false;
        };
        if !self.remove(id) {
            return false;
        }
        cart.add_item(item);
        true
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Wishlisted items resolved against the catalog, oldest first.
    #[must_use]
    pub fn items<'c>(&self, catalog: &'c dyn CatalogProvider) -> Vec<&'c CatalogItem> {
        self.ids.iter().filter_map(|id| catalog.get(id)).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        persist_state(self.repository.as_ref(), &self.key, &self.ids);
    }
}
