//! Cart commands.

use zafago_core::ItemId;
use zafago_storefront::{CartStore, CatalogProvider};

use super::{CommandError, Context};
use crate::output;

/// Print cart lines and totals.
pub fn show(ctx: &Context) {
    let catalog = ctx.session.catalog();
    let cart = ctx.session.cart();
    output::print_cart(cart.lines(), catalog, &cart.totals(catalog));
}

/// Add one unit of `id`.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn add(ctx: &mut Context, id: &ItemId) -> Result<(), CommandError> {
    if !ctx.session.add_to_cart(id) {
        return Err(CommandError::UnknownItem(id.clone()));
    }
    show(ctx);
    Ok(())
}

/// Remove the line for `id`.
pub fn remove(ctx: &mut Context, id: &ItemId) {
    ctx.session.cart_mut().remove_item(id);
    show(ctx);
}

/// Set the quantity of `id`, clamped to the cart's allowed range.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if `id` is not in the catalog and
/// `CommandError::NotInCart` if it is but the cart has no line for it.
pub fn set_quantity(ctx: &mut Context, id: &ItemId, quantity: i64) -> Result<(), CommandError> {
    require_line(ctx.session.cart(), ctx.session.catalog(), id)?;
    ctx.session.cart_mut().set_quantity(id, quantity);
    show(ctx);
    Ok(())
}

/// Empty the cart.
pub fn clear(ctx: &mut Context) {
    ctx.session.cart_mut().clear();
    output::print_message("Cart cleared");
}

fn require_line(
    cart: &CartStore,
    catalog: &dyn CatalogProvider,
    id: &ItemId,
) -> Result<(), CommandError> {
    if cart.contains(id) {
        Ok(())
    } else if catalog.contains(id) {
        Err(CommandError::NotInCart(id.clone()))
    } else {
        Err(CommandError::UnknownItem(id.clone()))
    }
}
