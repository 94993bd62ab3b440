//! Durable key-value persistence for per-identity and global state.
//!
//! # Keys
//!
//! Keys are namespaced by identity and store name:
//!
//! - `zafago:guest:cart` - anonymous shopper's cart
//! - `zafago:user:<id>:recently_viewed` - signed-in shopper's view history
//! - `zafago:global:reviews` - the shared review collection
//!
//! # Contract
//!
//! Stores never fail because of persistence. [`load_state`] treats a
//! missing or corrupt blob as "start empty" and [`persist_state`] logs save
//! failures without rolling back the in-memory mutation.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use zafago_core::Identity;

pub use file::FileStateRepository;
pub use memory::MemoryStateRepository;

/// Errors from the persistence layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backing storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Persisted state is corrupt or has an unexpected shape.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A lock guarding in-memory storage was poisoned.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// The stores that persist state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreName {
    Cart,
    RecentlyViewed,
    Wishlist,
    Reviews,
}

impl StoreName {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::RecentlyViewed => "recently_viewed",
            Self::Wishlist => "wishlist",
            Self::Reviews => "reviews",
        }
    }
}

/// A namespaced storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    const PREFIX: &'static str = "zafago";

    /// Key for state owned by one identity.
    #[must_use]
    pub fn scoped(identity: &Identity, store: StoreName) -> Self {
        Self(format!(
            "{}:{}:{}",
            Self::PREFIX,
            identity.storage_namespace(),
            store.as_str()
        ))
    }

    /// Key for state shared by every identity.
    #[must_use]
    pub fn global(store: StoreName) -> Self {
        Self(format!("{}:global:{}", Self::PREFIX, store.as_str()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durable key-value storage for serialized store state.
///
/// Implementations must be safe to share between stores; every store of a
/// session writes through the same repository.
pub trait StateRepository: Send + Sync {
    /// Load the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing storage cannot be read.
    fn load(&self, key: &StorageKey) -> Result<Option<String>, RepositoryError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing storage cannot be written.
    fn save(&self, key: &StorageKey, blob: &str) -> Result<(), RepositoryError>;

    /// Delete the blob stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the backing storage cannot be written.
    fn remove(&self, key: &StorageKey) -> Result<(), RepositoryError>;
}

/// Load and decode state, falling back to `T::default()`.
///
/// Missing state is normal for a new identity. Corrupt state and storage
/// errors are logged and recovered from locally.
pub fn load_state<T>(repository: &dyn StateRepository, key: &StorageKey) -> T
where
    T: DeserializeOwned + Default,
{
    match try_load_state(repository, key) {
        Ok(Some(state)) => state,
        Ok(None) => T::default(),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Discarding unreadable persisted state");
            T::default()
        }
    }
}

fn try_load_state<T: DeserializeOwned>(
    repository: &dyn StateRepository,
    key: &StorageKey,
) -> Result<Option<T>, RepositoryError> {
    let Some(blob) = repository.load(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&blob)
        .map(Some)
        .map_err(|e| RepositoryError::Deserialization(e.to_string()))
}

/// Encode and save state. Failures are logged, never returned.
///
/// Returns whether the save succeeded, for callers that want to report it.
pub fn persist_state<T>(repository: &dyn StateRepository, key: &StorageKey, state: &T) -> bool
where
    T: Serialize + ?Sized,
{
    let result = serde_json::to_string(state)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
        .and_then(|blob| repository.save(key, &blob));

    match result {
        Ok(()) => {
            tracing::trace!(key = %key, "Persisted state");
            true
        }
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Failed to persist state");
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::FailingRepository;

    #[test]
    fn test_scoped_keys_are_namespaced_by_identity() {
        let guest = StorageKey::scoped(&Identity::Anonymous, StoreName::Cart);
        let alice = StorageKey::scoped(&Identity::user("alice"), StoreName::Cart);
        assert_eq!(guest.as_str(), "zafago:guest:cart");
        assert_eq!(alice.as_str(), "zafago:user:alice:cart");
        assert_eq!(
            StorageKey::global(StoreName::Reviews).as_str(),
            "zafago:global:reviews"
        );
    }

    #[test]
    fn test_load_state_missing_is_default() {
        let repo = MemoryStateRepository::new();
        let key = StorageKey::global(StoreName::Reviews);
        let state: Vec<String> = load_state(&repo, &key);
        assert!(state.is_empty());
    }

    #[test]
    fn test_load_state_corrupt_is_default() {
        let repo = MemoryStateRepository::new();
        let key = StorageKey::scoped(&Identity::Anonymous, StoreName::Wishlist);
        repo.save(&key, "{not json").unwrap();
        let state: Vec<String> = load_state(&repo, &key);
        assert!(state.is_empty());
    }

    #[test]
    fn test_persist_then_load() {
        let repo = MemoryStateRepository::new();
        let key = StorageKey::scoped(&Identity::user("bob"), StoreName::Wishlist);
        assert!(persist_state(&repo, &key, &vec!["a", "b"]));
        let state: Vec<String> = load_state(&repo, &key);
        assert_eq!(state, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_persist_failure_is_reported_not_raised() {
        let repo = FailingRepository;
        let key = StorageKey::global(StoreName::Reviews);
        assert!(!persist_state(&repo, &key, &vec![1, 2, 3]));
        let state: Vec<i32> = load_state(&repo, &key);
        assert!(state.is_empty());
    }
}
