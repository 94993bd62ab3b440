//! Integration tests for the recently-viewed tracker.

use std::sync::Arc;

use zafago_core::{Identity, ItemId};
use zafago_integration_tests::plain_item;
use zafago_storefront::{
    CatalogIndex, MemoryStateRepository, RECENTLY_VIEWED_CAP, RecentlyViewedTracker,
};

fn abc_catalog() -> CatalogIndex {
    CatalogIndex::new(vec![
        plain_item("a", 100),
        plain_item("b", 100),
        plain_item("c", 100),
    ])
    .expect("valid catalog")
}

fn ids(tracker: &RecentlyViewedTracker) -> Vec<&str> {
    tracker.ids().iter().map(ItemId::as_str).collect()
}

#[test]
fn test_revisit_moves_item_to_front() {
    let catalog = abc_catalog();
    let mut viewed =
        RecentlyViewedTracker::load(Identity::Anonymous, Arc::new(MemoryStateRepository::new()));

    for id in ["a", "b", "c", "a"] {
        viewed.record_view(&catalog, &ItemId::from(id));
    }

    assert_eq!(ids(&viewed), vec!["a", "c", "b"]);
}

#[test]
fn test_same_item_twice_in_a_row_keeps_one_entry() {
    let catalog = abc_catalog();
    let mut viewed =
        RecentlyViewedTracker::load(Identity::Anonymous, Arc::new(MemoryStateRepository::new()));

    viewed.record_view(&catalog, &ItemId::from("b"));
    viewed.record_view(&catalog, &ItemId::from("c"));
    viewed.record_view(&catalog, &ItemId::from("c"));

    assert_eq!(ids(&viewed), vec!["c", "b"]);
}

#[test]
fn test_twenty_one_views_keep_twenty_most_recent() {
    let items = (0..21).map(|n| plain_item(&format!("item-{n:02}"), 500)).collect();
    let catalog = CatalogIndex::new(items).expect("valid catalog");
    let repo = Arc::new(MemoryStateRepository::new());
    let mut viewed = RecentlyViewedTracker::load(Identity::user("carol"), repo.clone());

    for n in 0..21 {
        viewed.record_view(&catalog, &ItemId::new(format!("item-{n:02}")));
    }

    assert_eq!(viewed.len(), RECENTLY_VIEWED_CAP);
    assert!(!viewed.ids().contains(&ItemId::from("item-00")));
    let expected: Vec<String> = (1..21).rev().map(|n| format!("item-{n:02}")).collect();
    assert_eq!(ids(&viewed), expected);

    let reloaded = RecentlyViewedTracker::load(Identity::user("carol"), repo);
    assert_eq!(ids(&reloaded), expected);
}
