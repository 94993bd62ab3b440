//! Zafago CLI - Drive a shopper session from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! zafago catalog list --genre rpg
//! zafago view elden-ring
//!
//! # Manage the cart
//! zafago cart add elden-ring
//! zafago cart set elden-ring 2
//! zafago cart show
//!
//! # Sign in as a user for one command
//! zafago --user alice review add elden-ring 5 "Worth every death"
//!
//! # Recommendations and checkout
//! zafago recommend --limit 4
//! zafago checkout --json
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, search and show catalog items
//! - `cart` - Show and edit the cart
//! - `view` / `viewed` - Record a view, show or clear view history
//! - `wishlist` - Save items for later
//! - `recommend` - Personalized or "more like this" recommendations
//! - `review` - Write, edit, delete and like reviews
//! - `checkout` - Simulated checkout that issues product keys

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zafago_core::{ItemId, ReviewId};

mod commands;
mod config;
mod output;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "zafago")]
#[command(author, version, about = "Zafago storefront CLI")]
struct Cli {
    /// Act as this signed-in user (overrides `ZAFAGO_USER`)
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Act as a guest even if `ZAFAGO_USER` is set
    #[arg(long, global = true, conflicts_with = "user")]
    guest: bool,

    /// Catalog document (overrides `ZAFAGO_CATALOG_PATH`)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// State directory (overrides `ZAFAGO_STATE_DIR`)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// RNG seed (overrides `ZAFAGO_RNG_SEED`)
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Show and edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Record a product page view and show the item
    View {
        /// Catalog item id
        item: ItemId,
    },
    /// Show recently viewed items
    Viewed {
        /// Forget the view history instead
        #[arg(long)]
        clear: bool,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Recommend items
    Recommend {
        /// Number of items (overrides `ZAFAGO_RECOMMENDATION_LIMIT`)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show items similar to this one instead of personalized picks
        #[arg(long)]
        similar: Option<ItemId>,
    },
    /// Read and write reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },
    /// Buy everything in the cart
    Checkout {
        /// Print the receipt as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List items, optionally filtered
    List {
        /// Only items with this genre
        #[arg(short, long)]
        genre: Option<String>,

        /// Only items whose title contains this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the highest-rated items
    Top {
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Show one item without recording a view
    Show { item: ItemId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add one unit of an item
    Add { item: ItemId },
    /// Remove an item's line
    Remove { item: ItemId },
    /// Set the quantity of an item already in the cart
    Set {
        item: ItemId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Show wishlisted items
    Show,
    /// Save an item for later
    Add { item: ItemId },
    /// Remove an item
    Remove { item: ItemId },
    /// Add the item if missing, remove it otherwise
    Toggle { item: ItemId },
    /// Move an item into the cart
    Move { item: ItemId },
}

#[derive(Subcommand)]
enum ReviewAction {
    /// Show reviews for an item
    List { item: ItemId },
    /// Show reviews written by the signed-in user
    Mine,
    /// Review an item
    Add {
        item: ItemId,
        /// Stars, 1 to 5
        #[arg(allow_negative_numbers = true)]
        rating: i64,
        body: String,
    },
    /// Edit one of your reviews
    Edit {
        review: ReviewId,
        #[arg(short, long, allow_negative_numbers = true)]
        rating: Option<i64>,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Delete one of your reviews
    Delete { review: ReviewId },
    /// Like someone else's review
    Like { review: ReviewId },
    /// Take back a like
    Unlike { review: ReviewId },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zafago=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::from_env()?;
    if let Some(user) = cli.user {
        config.user = Some(user);
    }
    if cli.guest {
        config.user = None;
    }
    if let Some(catalog) = cli.catalog {
        config.catalog_path = catalog;
    }
    if let Some(state_dir) = cli.state_dir {
        config.state_dir = state_dir;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }

    let mut ctx = commands::Context::open(config).await?;

    match cli.command {
        Commands::Catalog { action } => match action {
            CatalogAction::List { genre, search } => {
                commands::catalog::list(&ctx, genre.as_deref(), search.as_deref());
            }
            CatalogAction::Top { limit } => commands::catalog::top(&ctx, limit),
            CatalogAction::Show { item } => commands::catalog::show(&ctx, &item)?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { item } => commands::cart::add(&mut ctx, &item)?,
            CartAction::Remove { item } => commands::cart::remove(&mut ctx, &item),
            CartAction::Set { item, quantity } => {
                commands::cart::set_quantity(&mut ctx, &item, quantity)?;
            }
            CartAction::Clear => commands::cart::clear(&mut ctx),
        },
        Commands::View { item } => commands::history::view(&mut ctx, &item)?,
        Commands::Viewed { clear } => commands::history::viewed(&mut ctx, clear),
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(&ctx),
            WishlistAction::Add { item } => commands::wishlist::add(&mut ctx, &item)?,
            WishlistAction::Remove { item } => commands::wishlist::remove(&mut ctx, &item),
            WishlistAction::Toggle { item } => commands::wishlist::toggle(&mut ctx, &item)?,
            WishlistAction::Move { item } => commands::wishlist::move_to_cart(&mut ctx, &item)?,
        },
        Commands::Recommend { limit, similar } => {
            commands::recommend::recommend(&mut ctx, limit, similar.as_ref())?;
        }
        Commands::Review { action } => match action {
            ReviewAction::List { item } => commands::review::list(&ctx, &item)?,
            ReviewAction::Mine => commands::review::mine(&ctx)?,
            ReviewAction::Add { item, rating, body } => {
                commands::review::add(&ctx, &item, rating, body)?;
            }
            ReviewAction::Edit {
                review,
                rating,
                body,
            } => commands::review::edit(&ctx, review, rating, body)?,
            ReviewAction::Delete { review } => commands::review::delete(&ctx, review)?,
            ReviewAction::Like { review } => commands::review::like(&ctx, review)?,
            ReviewAction::Unlike { review } => commands::review::unlike(&ctx, review)?,
        },
        Commands::Checkout { json } => commands::checkout::checkout(&mut ctx, json)?,
    }
    Ok(())
}
