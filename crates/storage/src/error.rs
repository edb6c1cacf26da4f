//! Storage error types shared across credential-store implementations.

use std::fmt;

/// Errors that can occur when interacting with a credential backend.
///
/// This enum covers failures from any backend (filesystem, keychain, etc.).
/// "Slot is empty" is not an error -- [`crate::CredentialStore::get`]
/// returns `Ok(None)` for that.
#[derive(Debug)]
pub enum StorageError {
    /// The backend is unreachable or refused the operation.
    Unavailable(String),

    /// Reading or writing the slot failed.
    Io(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "credential store unavailable: {reason}"),
            Self::Io(reason) => write!(f, "credential slot io error: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}
