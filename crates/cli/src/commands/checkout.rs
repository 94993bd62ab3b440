//! Simulated checkout command.

use super::{CommandError, Context};
use crate::output;

/// Check out the cart and print the receipt.
///
/// # Errors
///
/// Returns `CommandError::Checkout` for an empty cart or stale cart lines.
pub fn checkout(ctx: &mut Context, json: bool) -> Result<(), CommandError> {
    let receipt = ctx.session.checkout(ctx.engine.rng_mut())?;
    if json {
        output::print_json(&receipt)?;
    } else {
        output::print_receipt(&receipt);
    }
    Ok(())
}
