//! Memoized similarity lookups.
//!
//! The catalog never changes after load, so ranked related-item lists can be
//! cached for the life of the index without invalidation.

use std::sync::Arc;

use moka::sync::Cache;

use zafago_core::ItemId;

/// Upper bound on cached `(item, count)` lookups.
const MAX_CACHED_LOOKUPS: u64 = 4_096;

/// Cache key for a related-items lookup.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct RelatedKey {
    pub item_id: ItemId,
    pub count: usize,
}

/// Ranked ids of related items.
pub type RelatedCache = Cache<RelatedKey, Arc<[ItemId]>>;

pub fn new_related_cache() -> RelatedCache {
    Cache::builder().max_capacity(MAX_CACHED_LOOKUPS).build()
}
