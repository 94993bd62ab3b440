//! Wishlist commands.

use zafago_core::ItemId;

use super::{CommandError, Context};
use crate::output;

/// Show wishlisted items.
pub fn show(ctx: &Context) {
    let items = ctx.session.wishlist().items(ctx.session.catalog());
    output::print_items("Wishlist", &items);
}

/// Save `id` for later.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn add(ctx: &mut Context, id: &ItemId) -> Result<(), CommandError> {
    ctx.item(id)?;
    if ctx.session.add_to_wishlist(id) {
        output::print_message(&format!("Saved {id} for later"));
    } else {
        output::print_message(&format!("{id} is already on your wishlist"));
    }
    Ok(())
}

/// Remove `id` from the wishlist.
pub fn remove(ctx: &mut Context, id: &ItemId) {
    if ctx.session.wishlist_mut().remove(id) {
        output::print_message(&format!("Removed {id} from your wishlist"));
    } else {
        output::print_message(&format!("{id} was not on your wishlist"));
    }
}

/// Flip wishlist membership of `id`.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn toggle(ctx: &mut Context, id: &ItemId) -> Result<(), CommandError> {
    ctx.item(id)?;
    if ctx.session.toggle_wishlist(id) {
        output::print_message(&format!("Saved {id} for later"));
    } else {
        output::print_message(&format!("Removed {id} from your wishlist"));
    }
    Ok(())
}

/// Move `id` from the wishlist to the cart.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn move_to_cart(ctx: &mut Context, id: &ItemId) -> Result<(), CommandError> {
    ctx.item(id)?;
    if ctx.session.move_to_cart(id) {
        output::print_message(&format!("Moved {id} to your cart"));
    } else {
        output::print_message(&format!("{id} is not on your wishlist"));
    }
    Ok(())
}
