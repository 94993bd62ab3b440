//! Command implementations.
//!
//! Every command runs against a [`Context`]: the loaded catalog, the
//! shopper session for the configured identity, and a random source.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod history;
pub mod recommend;
pub mod review;
pub mod wishlist;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use zafago_core::{CatalogItem, IdentityId, ItemId, RatingError};
use zafago_storefront::catalog::CatalogFormat;
use zafago_storefront::{
    CatalogError, CatalogIndex, CatalogProvider, CheckoutError, FileStateRepository,
    RecommendationEngine, RepositoryError, ReviewAggregator, ReviewError, ShopperSession,
    StateRepository, SystemClock,
};

use crate::config::CliConfig;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Catalog file could not be read.
    #[error("Failed to read catalog {path}: {source}")]
    CatalogRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file could not be parsed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// State directory is unusable.
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    /// Item id is not in the catalog.
    #[error("Unknown item: {0}")]
    UnknownItem(ItemId),

    /// Item exists but the cart has no line for it.
    #[error("Item is not in the cart: {0}")]
    NotInCart(ItemId),

    /// Command needs a signed-in user.
    #[error("Sign in with --user to {0}")]
    SignInRequired(&'static str),

    #[error("Invalid rating: {0}")]
    Rating(#[from] RatingError),

    #[error("Review error: {0}")]
    Review(#[from] ReviewError),

    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Everything a command needs.
pub struct Context {
    pub config: CliConfig,
    pub session: ShopperSession,
    pub engine: RecommendationEngine,
}

impl Context {
    /// Load the catalog and open the session for the configured identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed, or the state
    /// directory cannot be created.
    pub async fn open(config: CliConfig) -> Result<Self, CommandError> {
        let catalog = load_catalog(&config.catalog_path).await?;
        let repository: Arc<dyn StateRepository> =
            Arc::new(FileStateRepository::open(&config.state_dir)?);

        let engine = config
            .rng_seed
            .map_or_else(RecommendationEngine::from_os_rng, RecommendationEngine::seeded);

        let session = ShopperSession::open(
            Arc::new(catalog),
            repository,
            Arc::new(SystemClock),
            config.identity(),
        );

        Ok(Self {
            config,
            session,
            engine,
        })
    }

    /// Look up a catalog item or fail with `UnknownItem`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::UnknownItem` if `id` is not in the catalog.
    pub fn item(&self, id: &ItemId) -> Result<&CatalogItem, CommandError> {
        self.session
            .catalog()
            .get(id)
            .ok_or_else(|| CommandError::UnknownItem(id.clone()))
    }

    /// The signed-in user, required for `action`.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::SignInRequired` for guests.
    pub fn require_user(&self, action: &'static str) -> Result<IdentityId, CommandError> {
        self.session
            .identity()
            .user_id()
            .cloned()
            .ok_or(CommandError::SignInRequired(action))
    }

    /// Load the global review collection.
    #[must_use]
    pub fn reviews(&self) -> ReviewAggregator {
        ReviewAggregator::load(
            Arc::clone(self.session.repository()),
            Arc::clone(self.session.clock()),
        )
    }
}

/// Read and index a catalog document.
async fn load_catalog(path: &Path) -> Result<CatalogIndex, CommandError> {
    let format = CatalogFormat::from_path(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::CatalogRead {
            path: path.display().to_string(),
            source,
        })?;
    let catalog = CatalogIndex::parse(&content, format)?;
    info!(path = %path.display(), items = catalog.len(), "Loaded catalog");
    Ok(catalog)
}
