//! File-backed credential slot.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{CredentialStore, StorageError};

// ---------------------------------------------------------------------------
// FileCredentialStore
// ---------------------------------------------------------------------------

/// Credential slot persisted as a single file on disk.
///
/// The file holds the raw token text; an absent file means an empty slot.
/// Parent directories are created on first write. Reads and writes are
/// whole-file, so the slot is only as atomic as the underlying
/// filesystem's rename-free write -- acceptable for a single-process
/// client with one writer.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Creates a store persisting the token at `path`.
    ///
    /// No I/O happens during construction; the file is touched lazily on
    /// the first [`CredentialStore::set`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The slot's on-disk location.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token.to_owned()))
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }
        fs::write(&self.path, token).map_err(|e| StorageError::Io(e.to_string()))?;
        debug!(path = %self.path.display(), "credential_slot_written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential_slot_cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// A unique temp path per test, so tests never share a slot.
    fn temp_slot(name: &str) -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir().join(format!(
            "wallet-credential-test-{}-{name}-{n}",
            std::process::id()
        ))
    }

    #[test]
    fn missing_file_is_empty_slot() {
        let store = FileCredentialStore::new(temp_slot("missing"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let store = FileCredentialStore::new(temp_slot("roundtrip"));
        store.set("jwt-token-xyz").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("jwt-token-xyz"));
        store.clear().unwrap();
    }

    #[test]
    fn clear_removes_the_file() {
        let store = FileCredentialStore::new(temp_slot("clear"));
        store.set("token").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_without_file_is_ok() {
        let store = FileCredentialStore::new(temp_slot("clear-missing"));
        store.clear().unwrap();
    }

    #[test]
    fn whitespace_only_file_is_empty_slot() {
        let store = FileCredentialStore::new(temp_slot("whitespace"));
        store.set("  \n").unwrap();
        assert_eq!(store.get().unwrap(), None);
        store.clear().unwrap();
    }
}
