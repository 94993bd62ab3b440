//! Read-only catalog index and similarity lookup.
//!
//! The catalog is loaded once per process and shared by every shopper via
//! `Arc`. Lookups preserve catalog order wherever ranking ties, so results
//! are deterministic for a given catalog file.

mod cache;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::instrument;

use zafago_core::{CatalogItem, ItemId, ProductKind};

use cache::{RelatedCache, RelatedKey};

/// Errors building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two catalog entries share an id.
    #[error("duplicate catalog item id: {0}")]
    DuplicateId(ItemId),

    /// The catalog document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Parse(String),

    /// The catalog file extension is not `.json`, `.yaml` or `.yml`.
    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),
}

/// Catalog document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFormat {
    Json,
    Yaml,
}

impl CatalogFormat {
    /// Pick a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnsupportedFormat` for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            other => Err(CatalogError::UnsupportedFormat(
                other.unwrap_or("<none>").to_owned(),
            )),
        }
    }
}

/// Read access to catalog reference data.
pub trait CatalogProvider: Send + Sync {
    /// Every item, in catalog order.
    fn all_items(&self) -> &[CatalogItem];

    /// Look up one item.
    fn get(&self, id: &ItemId) -> Option<&CatalogItem>;

    /// Up to `count` other items ranked by number of shared tags.
    fn related_items(&self, id: &ItemId, count: usize) -> Vec<&CatalogItem>;

    /// Up to `count` items with the highest rating.
    fn top_rated(&self, count: usize) -> Vec<&CatalogItem>;

    /// Whether `id` names a catalog item.
    fn contains(&self, id: &ItemId) -> bool {
        self.get(id).is_some()
    }
}

/// The in-memory catalog index.
pub struct CatalogIndex {
    items: Vec<CatalogItem>,
    positions: HashMap<ItemId, usize>,
    related: RelatedCache,
}

impl std::fmt::Debug for CatalogIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogIndex")
            .field("items", &self.items.len())
            .field("cached_related", &self.related.entry_count())
            .finish_non_exhaustive()
    }
}

impl CatalogIndex {
    /// Build an index over `items`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two items share an id.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        let mut positions = HashMap::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            if positions.insert(item.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }

        tracing::debug!(items = items.len(), "Built catalog index");

        Ok(Self {
            items,
            positions,
            related: cache::new_related_cache(),
        })
    }

    /// Parse a catalog document (a list of items).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed documents and
    /// `CatalogError::DuplicateId` for repeated ids.
    pub fn parse(content: &str, format: CatalogFormat) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> = match format {
            CatalogFormat::Json => {
                serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
            CatalogFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?
            }
        };
        Self::new(items)
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items carrying `genre` as a genre tag (case-insensitive).
    #[must_use]
    pub fn by_genre(&self, genre: &str) -> Vec<&CatalogItem> {
        self.items
            .iter()
            .filter(|item| item.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
            .collect()
    }

    /// Items of one product kind.
    #[must_use]
    pub fn by_kind(&self, kind: ProductKind) -> Vec<&CatalogItem> {
        self.items.iter().filter(|item| item.kind == kind).collect()
    }

    /// Items whose title contains `query` (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&CatalogItem> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .collect()
    }

    fn rank_related(&self, reference: &CatalogItem, count: usize) -> Arc<[ItemId]> {
        let mut scored: Vec<(usize, usize)> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.id != reference.id)
            .map(|(position, item)| (position, reference.shared_tag_count(item)))
            .filter(|&(_, shared)| shared > 0)
            .collect();

        // Stable: equal scores keep catalog order
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored
            .into_iter()
            .take(count)
            .filter_map(|(position, _)| self.items.get(position))
            .map(|item| item.id.clone())
            .collect()
    }
}

impl CatalogProvider for CatalogIndex {
    fn all_items(&self) -> &[CatalogItem] {
        &self.items
    }

    fn get(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.positions
            .get(id)
            .and_then(|&position| self.items.get(position))
    }

    #[instrument(level = "trace", skip(self, id), fields(item_id = %id))]
    fn related_items(&self, id: &ItemId, count: usize) -> Vec<&CatalogItem> {
        let Some(reference) = self.get(id) else {
            return Vec::new();
        };
        if count == 0 {
            return Vec::new();
        }

        let key = RelatedKey {
            item_id: id.clone(),
            count,
        };
        let ids = self
            .related
            .get_with(key, || self.rank_related(reference, count));

        ids.iter().filter_map(|related| self.get(related)).collect()
    }

    fn top_rated(&self, count: usize) -> Vec<&CatalogItem> {
        let mut ranked: Vec<&CatalogItem> = self.items.iter().collect();
        // Option orders None first, so descending puts unrated items last.
        // Stable sort keeps catalog order among equal ratings.
        ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
        ranked.truncate(count);
        ranked
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::{item, sample_catalog};

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id.to_string()).collect()
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = CatalogIndex::new(vec![item("a", 100), item("a", 200)]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "a"));
    }

    #[test]
    fn test_get_and_contains() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.get(&ItemId::from("forza")).unwrap().title,
            "FORZA"
        );
        assert!(!catalog.contains(&ItemId::from("missing")));
        assert_eq!(catalog.len(), 7);
    }

    #[test]
    fn test_related_ranked_by_shared_tags() {
        let catalog = sample_catalog();
        let related = catalog.related_items(&ItemId::from("elden-ring"), 10);
        // dark-souls shares rpg, souls-like, pc, ps5 (4);
        // hollow-knight shares souls-like, action, pc (3);
        // then pc/ps5-only overlaps in catalog order
        assert_eq!(
            ids(&related),
            vec!["dark-souls", "hollow-knight", "forza", "gran-turismo", "stardew"]
        );
    }

    #[test]
    fn test_related_excludes_self_and_untagged() {
        let catalog = sample_catalog();
        let related = catalog.related_items(&ItemId::from("stardew"), 10);
        assert!(related.iter().all(|i| i.id.as_str() != "stardew"));
        assert!(related.iter().all(|i| i.id.as_str() != "top-up-25"));
        assert!(catalog.related_items(&ItemId::from("top-up-25"), 5).is_empty());
    }

    #[test]
    fn test_related_respects_count_and_unknown_ids() {
        let catalog = sample_catalog();
        assert_eq!(catalog.related_items(&ItemId::from("elden-ring"), 2).len(), 2);
        assert!(catalog.related_items(&ItemId::from("elden-ring"), 0).is_empty());
        assert!(catalog.related_items(&ItemId::from("nope"), 3).is_empty());
    }

    #[test]
    fn test_related_cached_results_are_stable() {
        let catalog = sample_catalog();
        let first = ids(&catalog.related_items(&ItemId::from("forza"), 3));
        let second = ids(&catalog.related_items(&ItemId::from("forza"), 3));
        assert_eq!(first, second);
    }

    #[test]
    fn test_top_rated_orders_unrated_last() {
        let catalog = sample_catalog();
        let top = catalog.top_rated(10);
        assert_eq!(
            ids(&top),
            vec![
                "stardew",
                "elden-ring",
                "hollow-knight",
                "dark-souls",
                "gran-turismo",
                "forza",
                "top-up-25"
            ]
        );
        assert_eq!(catalog.top_rated(2).len(), 2);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = "- id: a\n  title: Alpha\n  price: \"9.99\"\n  genres: [rpg]\n- id: b\n  title: Beta\n  price: \"19.99\"\n  discount_percent: \"10\"\n";
        let catalog = CatalogIndex::parse(yaml, CatalogFormat::Yaml).unwrap();
        assert_eq!(catalog.len(), 2);

        let json = r#"[{"id": "a", "title": "Alpha", "price": "9.99"}]"#;
        let catalog = CatalogIndex::parse(json, CatalogFormat::Json).unwrap();
        assert_eq!(catalog.len(), 1);

        let bad = r#"[{"id": "a", "title": "Alpha", "price": "-1"}]"#;
        assert!(matches!(
            CatalogIndex::parse(bad, CatalogFormat::Json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            CatalogFormat::from_path(Path::new("catalog.yml")).unwrap(),
            CatalogFormat::Yaml
        );
        assert!(CatalogFormat::from_path(Path::new("catalog.csv")).is_err());
    }

    #[test]
    fn test_search_and_filters() {
        let catalog = sample_catalog();
        assert_eq!(ids(&catalog.search("sOuLs")), vec!["dark-souls"]);
        assert!(catalog.search("   ").is_empty());
        assert_eq!(ids(&catalog.by_genre("Racing")), vec!["forza", "gran-turismo"]);
        assert_eq!(
            ids(&catalog.by_kind(ProductKind::WalletTopUp)),
            vec!["top-up-25"]
        );
    }
}
