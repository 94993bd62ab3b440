//! Personalized recommendations.
//!
//! Candidates are pulled on demand from the shopper's recent views and cart,
//! backfilled with the best-rated catalog items, then shuffled. The random
//! source is injected so tests can seed it.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::instrument;

use zafago_core::{CatalogItem, ItemId};

use crate::cart::CartStore;
use crate::catalog::CatalogProvider;
use crate::recently_viewed::RecentlyViewedTracker;

/// How many recent views seed recommendations.
const RECENT_VIEW_SEEDS: usize = 3;

/// Ranks catalog items for one shopper.
#[derive(Debug, Clone)]
pub struct RecommendationEngine<R = StdRng> {
    rng: R,
}

impl RecommendationEngine<StdRng> {
    /// Reproducible engine for tests and demos.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Engine seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RecommendationEngine<R> {
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// The engine's random source, shared with other randomized features.
    pub const fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Up to `limit` distinct items for this shopper, in random order.
    ///
    /// Each of the three most recent views and each cart line contributes up
    /// to `limit / 2` related items. If that yields fewer than `limit`
    /// candidates, the highest-rated remaining items fill the gap.
    #[instrument(level = "debug", skip(self, catalog, viewed, cart))]
    pub fn personalized<'c>(
        &mut self,
        limit: usize,
        catalog: &'c dyn CatalogProvider,
        viewed: &RecentlyViewedTracker,
        cart: &CartStore,
    ) -> Vec<&'c CatalogItem> {
        if limit == 0 {
            return Vec::new();
        }
        let per_seed = limit / 2;

        let mut picks = Candidates::default();

        for id in viewed.most_recent(RECENT_VIEW_SEEDS) {
            picks.extend(catalog.related_items(id, per_seed));
        }
        let from_views = picks.len();

        for line in cart.lines() {
            picks.extend(catalog.related_items(&line.item_id, per_seed));
        }
        let from_cart = picks.len() - from_views;

        if picks.len() < limit {
            let needed = limit - picks.len();
            let backfill: Vec<&CatalogItem> = catalog
                .top_rated(catalog.all_items().len())
                .into_iter()
                .filter(|item| !picks.contains(&item.id))
                .take(needed)
                .collect();
            picks.extend(backfill);
        }

        tracing::debug!(
            from_views,
            from_cart,
            total = picks.len(),
            "Collected recommendation candidates"
        );

        let mut items = picks.into_items();
        items.shuffle(&mut self.rng);
        items.truncate(limit);
        items
    }

    /// "More like this": related items in ranked order, unshuffled.
    #[must_use]
    pub fn similar_to<'c>(
        &self,
        id: &ItemId,
        limit: usize,
        catalog: &'c dyn CatalogProvider,
    ) -> Vec<&'c CatalogItem> {
        catalog.related_items(id, limit)
    }
}

/// Insertion-ordered set of candidate items.
#[derive(Default)]
struct Candidates<'c> {
    items: Vec<&'c CatalogItem>,
    seen: HashSet<&'c ItemId>,
}

impl<'c> Candidates<'c> {
    fn extend(&mut self, items: impl IntoIterator<Item = &'c CatalogItem>) {
        for item in items {
            if self.seen.insert(&item.id) {
                self.items.push(item);
            }
        }
    }

    fn contains(&self, id: &ItemId) -> bool {
        self.seen.contains(id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn into_items(self) -> Vec<&'c CatalogItem> {
        self.items
    }
}
