//! Catalog browsing commands.

use zafago_core::ItemId;
use zafago_storefront::CatalogProvider;

use super::{CommandError, Context};
use crate::output;

/// List catalog items, filtered by genre and/or title text.
pub fn list(ctx: &Context, genre: Option<&str>, search: Option<&str>) {
    let catalog = ctx.session.catalog();
    let mut items: Vec<_> = match search {
        Some(query) => catalog.search(query),
        None => catalog.all_items().iter().collect(),
    };
    if let Some(genre) = genre {
        let in_genre = catalog.by_genre(genre);
        items.retain(|item| in_genre.iter().any(|g| g.id == item.id));
    }
    output::print_items(&format!("{} items", items.len()), &items);
}

/// Show the highest-rated items.
pub fn top(ctx: &Context, limit: usize) {
    let items = ctx.session.catalog().top_rated(limit);
    output::print_items("Top rated", &items);
}

/// Show one item with its review summary, without recording a view.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn show(ctx: &Context, id: &ItemId) -> Result<(), CommandError> {
    let item = ctx.item(id)?;
    let summary = ctx.reviews().rating_summary(id);
    output::print_item_detail(item, &summary);
    Ok(())
}
