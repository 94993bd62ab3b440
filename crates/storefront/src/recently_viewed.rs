//! Bounded, most-recent-first history of viewed catalog items.

use std::sync::Arc;

use zafago_core::{CatalogItem, Identity, ItemId};

use crate::catalog::CatalogProvider;
use crate::persistence::{StateRepository, StorageKey, StoreName, load_state, persist_state};

/// Maximum number of remembered views per identity.
pub const RECENTLY_VIEWED_CAP: usize = 20;

/// View history of one identity.
pub struct RecentlyViewedTracker {
    identity: Identity,
    key: StorageKey,
    ids: Vec<ItemId>,
    repository: Arc<dyn StateRepository>,
}

impl std::fmt::Debug for RecentlyViewedTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecentlyViewedTracker")
            .field("identity", &self.identity)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl RecentlyViewedTracker {
    /// Load the history for `identity`.
    #[must_use]
    pub fn load(identity: Identity, repository: Arc<dyn StateRepository>) -> Self {
        let key = StorageKey::scoped(&identity, StoreName::RecentlyViewed);
        let stored: Vec<ItemId> = load_state(repository.as_ref(), &key);
        Self {
            identity,
            key,
            ids: normalize(stored),
            repository,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Swap in another identity's history. Lists are never merged.
    pub fn switch_identity(&mut self, identity: Identity) {
        if identity == self.identity {
            return;
        }
        *self = Self::load(identity, Arc::clone(&self.repository));
    }

    /// Move `id` to the front of the history.
    ///
    /// Unknown items are ignored. The oldest entries are dropped once the
    /// list exceeds [`RECENTLY_VIEWED_CAP`].
    pub fn record_view(&mut self, catalog: &dyn CatalogProvider, id: &ItemId) {
        if !catalog.contains(id) {
            tracing::debug!(item_id = %id, "Ignoring view of unknown item");
            return;
        }
        self.ids.retain(|existing| existing != id);
        self.ids.insert(0, id.clone());
        self.ids.truncate(RECENTLY_VIEWED_CAP);
        tracing::debug!(item_id = %id, history = self.ids.len(), "Recorded view");
        self.persist();
    }

    /// Forget the whole history.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Viewed ids, most recent first.
    #[must_use]
    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    /// Up to `n` most recent ids.
    #[must_use]
    pub fn most_recent(&self, n: usize) -> &[ItemId] {
        self.ids.get(..n.min(self.ids.len())).unwrap_or_default()
    }

    /// Viewed items resolved against the catalog, most recent first.
    #[must_use]
    pub fn items<'c>(&self, catalog: &'c dyn CatalogProvider) -> Vec<&'c CatalogItem> {
        self.ids.iter().filter_map(|id| catalog.get(id)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn persist(&self) {
        persist_state(self.repository.as_ref(), &self.key, &self.ids);
    }
}

/// Drop duplicates (keeping the most recent) and enforce the cap.
fn normalize(ids: Vec<ItemId>) -> Vec<ItemId> {
    let mut unique: Vec<ItemId> = Vec::with_capacity(ids.len().min(RECENTLY_VIEWED_CAP));
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique.truncate(RECENTLY_VIEWED_CAP);
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::CatalogIndex;
    use crate::persistence::MemoryStateRepository;
    use crate::test_support::{item, sample_catalog};

    fn names(ids: &[ItemId]) -> Vec<&str> {
        ids.iter().map(ItemId::as_str).collect()
    }

    #[test]
    fn test_repeat_view_moves_to_front() {
        let catalog = sample_catalog();
        let repo = Arc::new(MemoryStateRepository::new());
        let mut viewed = RecentlyViewedTracker::load(Identity::Anonymous, repo);
        for id in ["forza", "stardew", "forza"] {
            viewed.record_view(catalog.as_ref(), &ItemId::from(id));
        }
        assert_eq!(names(viewed.ids()), vec!["forza", "stardew"]);
    }

    #[test]
    fn test_unknown_items_ignored() {
        let catalog = sample_catalog();
        let repo = Arc::new(MemoryStateRepository::new());
        let mut viewed = RecentlyViewedTracker::load(Identity::Anonymous, repo);
        viewed.record_view(catalog.as_ref(), &ItemId::from("ghost"));
        assert!(viewed.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let items: Vec<_> = (0..25).map(|n| item(&format!("game-{n}"), 100)).collect();
        let catalog = CatalogIndex::new(items).unwrap();
        let repo = Arc::new(MemoryStateRepository::new());
        let mut viewed = RecentlyViewedTracker::load(Identity::Anonymous, repo);

        for n in 0..25 {
            viewed.record_view(&catalog, &ItemId::new(format!("game-{n}")));
        }

        assert_eq!(viewed.len(), RECENTLY_VIEWED_CAP);
        assert_eq!(viewed.ids().first().unwrap().as_str(), "game-24");
        assert_eq!(viewed.ids().last().unwrap().as_str(), "game-5");
    }

    #[test]
    fn test_most_recent_and_items() {
        let catalog = sample_catalog();
        let repo = Arc::new(MemoryStateRepository::new());
        let mut viewed = RecentlyViewedTracker::load(Identity::Anonymous, repo);
        for id in ["forza", "stardew", "elden-ring"] {
            viewed.record_view(catalog.as_ref(), &ItemId::from(id));
        }
        assert_eq!(names(viewed.most_recent(2)), vec!["elden-ring", "stardew"]);
        assert_eq!(viewed.most_recent(10).len(), 3);
        let titles: Vec<&str> = viewed
            .items(catalog.as_ref())
            .iter()
            .map(|i| i.title.as_str())
            .collect();
        assert_eq!(titles, vec!["ELDEN-RING", "STARDEW", "FORZA"]);
    }

    #[test]
    fn test_identity_scoping() {
        let catalog = sample_catalog();
        let repo: Arc<dyn StateRepository> = Arc::new(MemoryStateRepository::new());
        let mut viewed = RecentlyViewedTracker::load(Identity::user("alice"), repo.clone());
        viewed.record_view(catalog.as_ref(), &ItemId::from("forza"));

        viewed.switch_identity(Identity::user("bob"));
        assert!(viewed.is_empty());
        viewed.record_view(catalog.as_ref(), &ItemId::from("stardew"));

        viewed.switch_identity(Identity::user("alice"));
        assert_eq!(names(viewed.ids()), vec!["forza"]);

        viewed.clear();
        let reloaded = RecentlyViewedTracker::load(Identity::user("alice"), repo);
        assert!(reloaded.is_empty());
    }

    #[test]
    fn test_loaded_state_is_normalized() {
        let repo = Arc::new(MemoryStateRepository::new());
        let key = StorageKey::scoped(&Identity::Anonymous, StoreName::RecentlyViewed);
        repo.save(&key, r#"["a", "b", "a", "c"]"#).unwrap();
        let viewed = RecentlyViewedTracker::load(Identity::Anonymous, repo);
        assert_eq!(names(viewed.ids()), vec!["a", "b", "c"]);
    }
}
