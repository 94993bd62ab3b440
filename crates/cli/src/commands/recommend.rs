//! Recommendation commands.

use zafago_core::ItemId;

use super::{CommandError, Context};
use crate::output;

/// Print personalized recommendations, or items similar to `similar`.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if `similar` names an unknown item.
pub fn recommend(
    ctx: &mut Context,
    limit: Option<usize>,
    similar: Option<&ItemId>,
) -> Result<(), CommandError> {
    let limit = limit.unwrap_or(ctx.config.recommendation_limit);

    if let Some(id) = similar {
        let item = ctx.item(id)?;
        let items = ctx.engine.similar_to(id, limit, ctx.session.catalog());
        output::print_items(&format!("More like {}", item.title), &items);
        return Ok(());
    }

    let items = ctx.session.recommendations(limit, &mut ctx.engine);
    output::print_items("Recommended for you", &items);
    Ok(())
}
