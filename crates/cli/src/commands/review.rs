//! Review commands.
//!
//! Reading reviews works for guests. Writing, editing, deleting and liking
//! need a signed-in user.

use zafago_core::{ItemId, ReviewId, ReviewPatch, ReviewRating};

use super::{CommandError, Context};
use crate::output;

/// Show reviews for an item, newest first.
///
/// # Errors
///
/// Returns `CommandError::UnknownItem` if the item does not exist.
pub fn list(ctx: &Context, item_id: &ItemId) -> Result<(), CommandError> {
    let item = ctx.item(item_id)?;
    let reviews = ctx.reviews();
    let heading = format!("{}: {}", item.title, reviews.rating_summary(item_id));
    output::print_reviews(&heading, &reviews.reviews_for_item(item_id));
    Ok(())
}

/// Show the signed-in user's reviews.
///
/// # Errors
///
/// Returns `CommandError::SignInRequired` for guests.
pub fn mine(ctx: &Context) -> Result<(), CommandError> {
    let author = ctx.require_user("list your reviews")?;
    let reviews = ctx.reviews();
    output::print_reviews("Your reviews", &reviews.reviews_by_author(&author));
    Ok(())
}

/// Review an item.
///
/// # Errors
///
/// Fails for guests, unknown items, ratings outside 1-5, and repeat reviews.
pub fn add(
    ctx: &Context,
    item_id: &ItemId,
    rating: i64,
    body: String,
) -> Result<(), CommandError> {
    let author = ctx.require_user("write reviews")?;
    ctx.item(item_id)?;
    let rating = ReviewRating::new(rating)?;

    let review = ctx.reviews().add_review(&author, item_id, rating, body)?;
    output::print_message(&format!("Posted review {}", review.id));
    Ok(())
}

/// Edit one of the signed-in user's reviews.
///
/// # Errors
///
/// Fails for guests, invalid ratings, unknown reviews, and other users' reviews.
pub fn edit(
    ctx: &Context,
    review_id: ReviewId,
    rating: Option<i64>,
    body: Option<String>,
) -> Result<(), CommandError> {
    let author = ctx.require_user("edit reviews")?;
    let patch = ReviewPatch {
        rating: rating.map(ReviewRating::new).transpose()?,
        body,
    };
    if patch.is_empty() {
        output::print_message("Nothing to change");
        return Ok(());
    }

    let review = ctx.reviews().update_review(review_id, &author, patch)?;
    output::print_message(&output::review_line(&review));
    Ok(())
}

/// Delete one of the signed-in user's reviews.
///
/// # Errors
///
/// Fails for guests, unknown reviews, and other users' reviews.
pub fn delete(ctx: &Context, review_id: ReviewId) -> Result<(), CommandError> {
    let author = ctx.require_user("delete reviews")?;
    ctx.reviews().delete_review(review_id, &author)?;
    output::print_message(&format!("Deleted review {review_id}"));
    Ok(())
}

/// Like a review.
///
/// # Errors
///
/// Fails for guests, unknown reviews, and repeat likes.
pub fn like(ctx: &Context, review_id: ReviewId) -> Result<(), CommandError> {
    let liker = ctx.require_user("like reviews")?;
    let review = ctx.reviews().like_review(review_id, &liker)?;
    output::print_message(&format!("Liked review {} ({} likes)", review.id, review.likes));
    Ok(())
}

/// Take back a like.
///
/// # Errors
///
/// Fails for guests, unknown reviews, and reviews not liked by this user.
pub fn unlike(ctx: &Context, review_id: ReviewId) -> Result<(), CommandError> {
    let liker = ctx.require_user("unlike reviews")?;
    let review = ctx.reviews().unlike_review(review_id, &liker)?;
    output::print_message(&format!("Unliked review {} ({} likes)", review.id, review.likes));
    Ok(())
}
