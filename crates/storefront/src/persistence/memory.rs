//! In-memory repository, for tests and unpersisted sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{RepositoryError, StateRepository, StorageKey};

/// A [`StateRepository`] backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct MemoryStateRepository {
    entries: RwLock<HashMap<StorageKey, String>>,
}

impl MemoryStateRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Poisoned` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self
            .entries
            .read()
            .map_err(|_| RepositoryError::Poisoned)?
            .len())
    }

    /// Whether nothing has been stored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Poisoned` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        self.len().map(|n| n == 0)
    }
}

impl StateRepository for MemoryStateRepository {
    fn load(&self, key: &StorageKey) -> Result<Option<String>, RepositoryError> {
        let entries = self.entries.read().map_err(|_| RepositoryError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &StorageKey, blob: &str) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().map_err(|_| RepositoryError::Poisoned)?;
        entries.insert(key.clone(), blob.to_owned());
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), RepositoryError> {
        let mut entries = self.entries.write().map_err(|_| RepositoryError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
