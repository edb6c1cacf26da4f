//! Session-invalidation listener registry.
//!
//! A 401 from the service must invalidate the session no matter which
//! call observed it. Rather than having the transport layer reach into
//! session state itself, it fires an explicit subscription: named,
//! ordered listeners that the session layer registers at construction.
//! This keeps the gateway and the session concerns testable in
//! isolation.

use std::sync::{Arc, RwLock};

use tracing::debug;

// ---------------------------------------------------------------------------
// InvalidationListener
// ---------------------------------------------------------------------------

/// Callback run when the gateway observes an unauthorized response.
///
/// Listeners run synchronously on the task that observed the 401, after
/// the credential slot has been cleared. Implementations must not call
/// back into the gateway.
pub trait InvalidationListener: Send + Sync {
    /// The session credential was rejected by the service.
    fn on_session_invalidated(&self);
}

// ---------------------------------------------------------------------------
// InvalidationRegistry
// ---------------------------------------------------------------------------

/// Ordered registry of named invalidation listeners.
///
/// Read-locks are taken when firing; write-locks only during add/remove.
pub struct InvalidationRegistry {
    listeners: RwLock<Vec<(&'static str, Arc<dyn InvalidationListener>)>>,
}

impl InvalidationRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Adds a named listener.
    ///
    /// If a listener with the same name already exists, it is replaced
    /// in-place (preserving order). Otherwise the listener is appended.
    pub fn add(&self, name: &'static str, listener: Arc<dyn InvalidationListener>) {
        let mut chain = self.listeners.write().unwrap();
        if let Some(entry) = chain.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = listener;
        } else {
            chain.push((name, listener));
        }
    }

    /// Removes a named listener. Returns `true` if one was found.
    pub fn remove(&self, name: &'static str) -> bool {
        let mut chain = self.listeners.write().unwrap();
        let len_before = chain.len();
        chain.retain(|(n, _)| *n != name);
        chain.len() < len_before
    }

    /// Notifies every listener, in registration order.
    pub fn fire(&self) {
        let chain = self.listeners.read().unwrap();
        debug!(listeners = chain.len(), "session_invalidation_fired");
        for (_, listener) in chain.iter() {
            listener.on_session_invalidated();
        }
    }

    /// Returns `true` if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.read().unwrap().is_empty()
    }
}

impl Default for InvalidationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
