//! Terminal output.
//!
//! Formatting is kept in pure functions so it can be tested; the `print_*`
//! functions are the only place the CLI writes to stdout.

#![allow(clippy::print_stdout)]

use rust_decimal::Decimal;
use zafago_core::price::format_money;
use zafago_core::{CatalogItem, Review};
use zafago_storefront::{CartLine, CartTotals, CatalogProvider, OrderReceipt, RatingSummary};

/// One-line summary of a catalog item.
#[must_use]
pub fn item_line(item: &CatalogItem) -> String {
    let mut line = format!("{:<20} {:<32} ", item.id.as_str(), item.title);
    if item.discount_percent.is_zero() {
        line.push_str(&item.price.display());
    } else {
        line.push_str(&format!(
            "{} ({}% off {})",
            format_money(item.discounted_price()),
            item.discount_percent.percent().normalize(),
            item.price.display()
        ));
    }
    if let Some(rating) = item.rating {
        line.push_str(&format!("  {}*", rating.normalize()));
    }
    line
}

/// One-line summary of a cart line.
#[must_use]
pub fn cart_line(line: &CartLine, catalog: &dyn CatalogProvider) -> String {
    match catalog.get(&line.item_id) {
        Some(item) => format!(
            "{:>3} x {:<32} {}",
            line.quantity,
            item.title,
            format_money(item.discounted_price() * Decimal::from(line.quantity))
        ),
        None => format!("{:>3} x {} (no longer sold)", line.quantity, line.item_id),
    }
}

/// One-line summary of a review.
#[must_use]
pub fn review_line(review: &Review) -> String {
    format!(
        "[{}] {} by {} ({} likes): {}",
        review.id, review.rating, review.author, review.likes, review.body
    )
}

pub fn print_message(message: &str) {
    println!("{message}");
}

pub fn print_items(heading: &str, items: &[&CatalogItem]) {
    println!("{heading}");
    if items.is_empty() {
        println!("  (none)");
    }
    for item in items {
        println!("  {}", item_line(item));
    }
}

pub fn print_item_detail(item: &CatalogItem, reviews: &RatingSummary) {
    println!("{}", item_line(item));
    println!("  kind:      {}", item.kind);
    if !item.genres.is_empty() {
        println!("  genres:    {}", join(&item.genres));
    }
    if !item.platforms.is_empty() {
        println!("  platforms: {}", join(&item.platforms));
    }
    println!("  reviews:   {reviews}");
    if let Some(description) = &item.description {
        println!();
        println!("{description}");
    }
}

pub fn print_cart(lines: &[CartLine], catalog: &dyn CatalogProvider, totals: &CartTotals) {
    if lines.is_empty() {
        println!("Cart is empty");
        return;
    }
    for line in lines {
        println!("{}", cart_line(line, catalog));
    }
    println!("Subtotal: {}", totals.subtotal_display());
    println!("Discount: {}", totals.discount_display());
    println!("Total:    {}", totals.total_display());
}

pub fn print_reviews(heading: &str, reviews: &[&Review]) {
    println!("{heading}");
    if reviews.is_empty() {
        println!("  (none)");
    }
    for review in reviews {
        println!("  {}", review_line(review));
    }
}

pub fn print_receipt(receipt: &OrderReceipt) {
    println!("Order {} placed {}", receipt.order_id, receipt.placed_at.to_rfc3339());
    for line in &receipt.lines {
        println!(
            "{:>3} x {:<32} {}",
            line.quantity,
            line.title,
            format_money(line.line_total)
        );
        for key in &line.product_keys {
            println!("        key: {key}");
        }
    }
    println!("Total: {}", receipt.totals.total_display());
}

/// Print any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
