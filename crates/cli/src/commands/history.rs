//! Product views and view history.

use zafago_core::ItemId;

use super::{CommandError, Context};
use crate::output;

/// Record a view of `id` and show the item.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn view(ctx: &mut Context, id: &ItemId) -> Result<(), CommandError> {
    let summary = ctx.reviews().rating_summary(id);
    let item = ctx
        .session
        .view_item(id)
        .ok_or_else(|| CommandError::UnknownItem(id.clone()))?;
    output::print_item_detail(item, &summary);
    Ok(())
}

/// Show the view history, or clear it.
pub fn viewed(ctx: &mut Context, clear: bool) {
    if clear {
        ctx.session.clear_recently_viewed();
        output::print_message("View history cleared");
        return;
    }
    let items = ctx
        .session
        .recently_viewed()
        .items(ctx.session.catalog());
    output::print_items("Recently viewed", &items);
}
