//! Wallet service configuration.
//!
//! This crate provides the client-side configuration for the remote ledger
//! service:
//!
//! - [`ServiceConfig`] -- base URL and timeouts for a service deployment
//! - [`constants`] -- protocol-level parameters (endpoints, timeouts,
//!   view windowing)
//!
//! `config` has no dependencies on transport or any runtime crate, so it
//! can be used freely as a leaf dependency.

pub mod constants;

use std::time::Duration;

use constants::{
    BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Configuration for one ledger-service deployment.
///
/// The base URL carries the API prefix (e.g. `http://localhost:8080/api`);
/// route paths are appended to it verbatim. Trailing slashes are stripped
/// at construction so route joining never produces `//`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base_url: String,

    /// TCP connect timeout.
    pub connect_timeout: Duration,

    /// Whole-request timeout (connect + transfer).
    pub request_timeout: Duration,
}

impl ServiceConfig {
    /// Configuration pointing at the given base URL with default timeouts.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
        }
    }

    /// Configuration for the local development backend.
    pub fn local() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Configuration from the environment.
    ///
    /// Reads [`constants::BASE_URL_ENV`]; falls back to [`Self::local`]
    /// when unset or empty.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::local(),
        }
    }

    /// The base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::local()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_config_uses_default_base_url() {
        let config = ServiceConfig::local();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(
            config.request_timeout,
            Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
        );
    }

    #[test]
    fn trailing_slashes_are_stripped() {
        let config = ServiceConfig::new("https://wallet.example.com/api///");
        assert_eq!(config.base_url(), "https://wallet.example.com/api");
    }

    #[test]
    fn default_is_local() {
        assert_eq!(ServiceConfig::default(), ServiceConfig::local());
    }
}
