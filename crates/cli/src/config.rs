//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ZAFAGO_STATE_DIR` - Directory holding persisted shopper state (default: .zafago)
//! - `ZAFAGO_CATALOG_PATH` - Catalog document, `.yaml`/`.yml` or `.json` (default: catalog.yaml)
//! - `ZAFAGO_USER` - Signed-in user id; unset means guest
//! - `ZAFAGO_RECOMMENDATION_LIMIT` - Default number of recommendations (default: 8)
//! - `ZAFAGO_RNG_SEED` - Seed for reproducible recommendations and product keys

use std::path::PathBuf;

use thiserror::Error;

use zafago_core::Identity;

const DEFAULT_STATE_DIR: &str = ".zafago";
const DEFAULT_CATALOG_PATH: &str = "catalog.yaml";
const DEFAULT_RECOMMENDATION_LIMIT: &str = "8";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Where shopper state is persisted
    pub state_dir: PathBuf,
    /// Catalog document to load
    pub catalog_path: PathBuf,
    /// Signed-in user, if any
    pub user: Option<String>,
    /// Default recommendation count
    pub recommendation_limit: usize,
    /// Fixed RNG seed, if any
    pub rng_seed: Option<u64>,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let state_dir =
            PathBuf::from(get_or_default(&lookup, "ZAFAGO_STATE_DIR", DEFAULT_STATE_DIR));
        let catalog_path = PathBuf::from(get_or_default(
            &lookup,
            "ZAFAGO_CATALOG_PATH",
            DEFAULT_CATALOG_PATH,
        ));
        let user = get_optional(&lookup, "ZAFAGO_USER");

        let recommendation_limit = get_or_default(
            &lookup,
            "ZAFAGO_RECOMMENDATION_LIMIT",
            DEFAULT_RECOMMENDATION_LIMIT,
        )
        .parse::<usize>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ZAFAGO_RECOMMENDATION_LIMIT".to_string(), e.to_string())
        })?;
        if recommendation_limit == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ZAFAGO_RECOMMENDATION_LIMIT".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let rng_seed = get_optional(&lookup, "ZAFAGO_RNG_SEED")
            .map(|seed| {
                seed.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("ZAFAGO_RNG_SEED".to_string(), e.to_string())
                })
            })
            .transpose()?;

        Ok(Self {
            state_dir,
            catalog_path,
            user,
            recommendation_limit,
            rng_seed,
        })
    }

    /// The shopper identity this invocation acts as.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from_token(self.user.as_deref())
    }
}

/// Get an optional variable, treating blank values as unset.
fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Get a variable with a default value.
fn get_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional(lookup, key).unwrap_or_else(|| default.to_string())
}
