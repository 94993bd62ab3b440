//! End-to-end shopper session tests.

use std::collections::HashSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use zafago_core::{Identity, ItemId, ReviewRating};
use zafago_integration_tests::{TestClock, fixture_catalog, memory_session};
use zafago_storefront::{
    CatalogProvider, CheckoutError, FileStateRepository, RECENTLY_VIEWED_CAP, ReviewAggregator,
    ShopperSession, StateRepository, StorefrontError,
};

// =============================================================================
// Identity Switching
// =============================================================================

#[test]
fn test_sign_in_and_out_keeps_state_per_identity() {
    let (mut session, _) = memory_session(Identity::Anonymous);
    session.add_to_cart(&ItemId::from("forza"));
    session.record_view(&ItemId::from("forza"));

    session.switch_identity(Identity::user("erin"));
    assert!(session.cart().is_empty());
    assert!(session.recently_viewed().is_empty());
    session.add_to_cart(&ItemId::from("stardew"));

    session.switch_identity(Identity::user("frank"));
    assert!(session.cart().is_empty());

    session.switch_identity(Identity::Anonymous);
    assert!(session.cart().contains(&ItemId::from("forza")));
    assert!(!session.cart().contains(&ItemId::from("stardew")));

    session.switch_identity(Identity::user("erin"));
    assert!(session.cart().contains(&ItemId::from("stardew")));
    assert!(!session.cart().contains(&ItemId::from("forza")));
}

#[test]
fn test_sessions_on_disk_resume() {
    let dir = tempfile::tempdir().expect("temp dir");
    let open = || {
        let repo: Arc<dyn StateRepository> =
            Arc::new(FileStateRepository::open(dir.path()).expect("open repo"));
        ShopperSession::open(
            fixture_catalog(),
            repo,
            Arc::new(TestClock::new()),
            Identity::user("gwen"),
        )
    };

    {
        let mut session = open();
        session.view_item(&ItemId::from("elden-ring"));
        session.add_to_wishlist(&ItemId::from("hollow-knight"));
        session.add_to_cart(&ItemId::from("dark-souls"));
    }

    let session = open();
    assert_eq!(session.recently_viewed().ids(), &[ItemId::from("elden-ring")]);
    assert!(session.wishlist().contains(&ItemId::from("hollow-knight")));
    assert_eq!(session.cart().quantity_of(&ItemId::from("dark-souls")), 1);
}

// =============================================================================
// Checkout
// =============================================================================

#[test]
fn test_full_shopping_trip() -> Result<(), StorefrontError> {
    let (mut session, repo) = memory_session(Identity::user("hana"));
    let mut rng = StdRng::seed_from_u64(2026);

    session.view_item(&ItemId::from("hollow-knight"));
    session.add_to_wishlist(&ItemId::from("dark-souls"));
    assert!(session.move_to_cart(&ItemId::from("dark-souls")));
    session.add_to_cart(&ItemId::from("hollow-knight"));
    session.cart_mut().set_quantity(&ItemId::from("hollow-knight"), 2);

    let receipt = session.checkout(&mut rng)?;
    assert_eq!(receipt.lines.len(), 2);
    let keys: usize = receipt.lines.iter().map(|line| line.product_keys.len()).sum();
    assert_eq!(keys, 3);
    // 39.99 * 0.5 + 2 * 14.99
    assert_eq!(receipt.totals.total_display(), "$49.98");
    assert!(session.cart().is_empty());

    let mut reviews = ReviewAggregator::load(Arc::clone(&repo), Arc::new(TestClock::new()));
    let author = session.identity().user_id().cloned().expect("signed in");
    reviews.add_review(
        &author,
        &ItemId::from("hollow-knight"),
        ReviewRating::new(5)?,
        "Bought it",
    )?;

    let err = session.checkout(&mut rng).map_err(StorefrontError::from);
    assert!(matches!(
        err,
        Err(StorefrontError::Checkout(CheckoutError::EmptyCart))
    ));
    Ok(())
}

// =============================================================================
// Randomized Operation Sequences
// =============================================================================

fn assert_invariants(session: &ShopperSession) {
    let lines = session.cart().lines();
    let unique: HashSet<&ItemId> = lines.iter().map(|line| &line.item_id).collect();
    assert_eq!(unique.len(), lines.len(), "duplicate cart lines");
    assert!(lines.iter().all(|line| line.quantity >= 1));

    let viewed = session.recently_viewed().ids();
    let unique: HashSet<&ItemId> = viewed.iter().collect();
    assert_eq!(unique.len(), viewed.len(), "duplicate views");
    assert!(viewed.len() <= RECENTLY_VIEWED_CAP);

    let totals = session.cart().totals(session.catalog());
    assert_eq!(totals.subtotal - totals.discount, totals.total);
}

#[test]
fn test_random_operation_sequences_keep_invariants() {
    let catalog = fixture_catalog();
    let mut ids: Vec<ItemId> = catalog.all_items().iter().map(|item| item.id.clone()).collect();
    ids.push(ItemId::from("not-for-sale"));
    let identities = [Identity::Anonymous, Identity::user("ivy"), Identity::user("jon")];

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let (mut session, _) = memory_session(Identity::Anonymous);

        for _ in 0..200 {
            let id = ids.choose(&mut rng).expect("non-empty ids");
            match rng.random_range(0..6) {
                0 | 1 => {
                    session.add_to_cart(id);
                }
                2 => session.cart_mut().remove_item(id),
                3 => session.cart_mut().set_quantity(id, rng.random_range(-3..6)),
                4 => session.record_view(id),
                _ => {
                    let identity = identities.choose(&mut rng).expect("non-empty identities");
                    session.switch_identity(identity.clone());
                }
            }
            assert_invariants(&session);
        }
    }
}
