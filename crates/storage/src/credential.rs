//! Credential slot trait and in-memory implementation.

use std::sync::RwLock;

use crate::StorageError;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A single named slot holding the session credential token.
///
/// The slot has exactly one writer (the session layer) and one external
/// invalidator (the gateway's 401 handling). Absence of a token means
/// logged out; no expiry metadata is kept -- a stored token is trusted
/// until the service rejects it.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored token, or `None` if the slot is empty.
    fn get(&self) -> Result<Option<String>, StorageError>;

    /// Stores `token`, replacing any previous value.
    fn set(&self, token: &str) -> Result<(), StorageError>;

    /// Empties the slot. Clearing an already-empty slot is not an error.
    fn clear(&self) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// InMemoryCredentialStore
// ---------------------------------------------------------------------------

/// In-memory credential slot backed by `RwLock<Option<String>>`.
///
/// The default store for tests and short-lived clients; the token does
/// not survive process restart.
pub struct InMemoryCredentialStore {
    slot: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// Creates a slot pre-populated with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: RwLock::new(Some(token.into())),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.read().unwrap().clone())
    }

    fn set(&self, token: &str) -> Result<(), StorageError> {
        *self.slot.write().unwrap() = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        *self.slot.write().unwrap() = None;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slot_returns_none() {
        let store = InMemoryCredentialStore::new();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let store = InMemoryCredentialStore::new();
        store.set("token-abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("token-abc"));
    }

    #[test]
    fn set_replaces_existing() {
        let store = InMemoryCredentialStore::with_token("old");
        store.set("new").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("new"));
    }

    #[test]
    fn clear_empties_the_slot() {
        let store = InMemoryCredentialStore::with_token("token");
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let store = InMemoryCredentialStore::new();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
