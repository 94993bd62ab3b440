//! File-backed repository: one JSON document per key in a state directory.
//!
//! This is the local-storage analogue used by the command-line front end.
//! Writes go to a temporary sibling file first and are renamed into place,
//! so a crash mid-write leaves the previous state intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{RepositoryError, StateRepository, StorageKey};

/// A [`StateRepository`] that stores each key as a file under `root`.
#[derive(Debug, Clone)]
pub struct FileStateRepository {
    root: PathBuf,
}

impl FileStateRepository {
    /// Open (and create if needed) a state directory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened state directory");
        Ok(Self { root })
    }

    /// The state directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &StorageKey) -> PathBuf {
        self.root.join(format!("{}.json", file_stem(key)))
    }
}

/// Map a key to a file-name-safe stem.
///
/// Percent-encoding escapes `%` itself, so distinct keys never share a file.
fn file_stem(key: &StorageKey) -> String {
    urlencoding::encode(key.as_str()).into_owned()
}

impl StateRepository for FileStateRepository {
    fn load(&self, key: &StorageKey) -> Result<Option<String>, RepositoryError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &StorageKey, blob: &str) -> Result<(), RepositoryError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &StorageKey) -> Result<(), RepositoryError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persistence::StoreName;
    use zafago_core::Identity;

    #[test]
    fn test_file_stem_is_sanitized() {
        let key = StorageKey::scoped(&Identity::user("a/b c"), StoreName::Cart);
        assert_eq!(file_stem(&key), "zafago%3Auser%3Aa%2Fb%20c%3Acart");
    }

    #[test]
    fn test_file_stems_do_not_collide() {
        let stems: Vec<String> = ["bob@x.com", "bob_x_com", "bob%40x.com", "bob-x-com"]
            .into_iter()
            .map(|id| file_stem(&StorageKey::scoped(&Identity::user(id), StoreName::Cart)))
            .collect();
        for (i, stem) in stems.iter().enumerate() {
            assert!(!stems.iter().skip(i + 1).any(|other| other == stem), "{stem}");
        }
    }

    #[test]
    fn test_lookalike_identities_keep_separate_state() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::open(dir.path()).unwrap();
        let email = StorageKey::scoped(&Identity::user("bob@x.com"), StoreName::Cart);
        let underscored = StorageKey::scoped(&Identity::user("bob_x_com"), StoreName::Cart);

        repo.save(&email, "[\"forza\"]").unwrap();
        assert!(repo.load(&underscored).unwrap().is_none());

        repo.save(&underscored, "[]").unwrap();
        assert_eq!(repo.load(&email).unwrap().as_deref(), Some("[\"forza\"]"));
    }

    #[test]
    fn test_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileStateRepository::open(dir.path().join("state")).unwrap();
        let key = StorageKey::scoped(&Identity::user("alice"), StoreName::Wishlist);

        assert!(repo.load(&key).unwrap().is_none());
        repo.save(&key, "[\"elden-ring\"]").unwrap();
        assert_eq!(
            repo.load(&key).unwrap().as_deref(),
            Some("[\"elden-ring\"]")
        );

        // A second repository over the same directory sees the same state
        let reopened = FileStateRepository::open(repo.root()).unwrap();
        assert!(reopened.load(&key).unwrap().is_some());

        repo.remove(&key).unwrap();
        assert!(repo.load(&key).unwrap().is_none());
        repo.remove(&key).unwrap();
    }
}
