//! Persisted credential slot for the wallet client.
//!
//! This crate models the client's single piece of durable state -- the
//! session credential token -- as an injected storage capability rather
//! than an ambient global, so the session layer and the transport layer
//! can share one slot and tests can substitute a double.
//!
//! - [`CredentialStore`] -- the slot interface (get/set/clear)
//! - [`InMemoryCredentialStore`] -- process-local slot, default for tests
//! - [`FileCredentialStore`] -- single-file slot for real clients
//! - [`StorageError`] -- backend failures (an empty slot is not an error)

mod credential;
mod error;
mod file;

pub use credential::{CredentialStore, InMemoryCredentialStore};
pub use error::StorageError;
pub use file::FileCredentialStore;
