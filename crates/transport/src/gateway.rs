//! The remote-gateway contract.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use crate::invalidation::InvalidationListener;
use crate::wire::{LedgerRecord, Receipt};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Broad classification of a normalized gateway failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// HTTP 401: the credential was rejected. The gateway has already
    /// cleared the slot and fired the invalidation listeners.
    Unauthorized,

    /// The service understood the request and refused it (4xx business
    /// rejection: insufficient funds, unknown recipient, taken username).
    Rejected,

    /// Transport failure or a response the client could not use (no
    /// connection, timeout, 5xx, undecodable body).
    Network,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Rejected => write!(f, "rejected"),
            Self::Network => write!(f, "network"),
        }
    }
}

/// A failure normalized at the gateway boundary.
///
/// `message` is always displayable: it is the service's envelope message
/// when one was present, else a route-specific default. Orchestration
/// code maps `kind` into its own taxonomy and passes `message` through
/// untouched.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct GatewayError {
    pub kind: ErrorKind,
    pub message: String,
}

impl GatewayError {
    /// A 401 rejection.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Unauthorized,
            message: message.into(),
        }
    }

    /// A business rejection.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Rejected,
            message: message.into(),
        }
    }

    /// A transport-level failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Network,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Gateway trait
// ---------------------------------------------------------------------------

/// Typed access to the remote ledger service.
///
/// Implementations must satisfy three contract points regardless of
/// transport:
///
/// 1. attach the stored credential to every request when present;
/// 2. normalize every failure into [`GatewayError`] before returning;
/// 3. on an unauthorized response, clear the credential slot and fire
///    the registered invalidation listeners, whatever the call site.
///
/// The production implementation is [`crate::HttpGateway`]; tests
/// substitute scripted doubles.
pub trait Gateway: Send + Sync {
    /// `POST /auth/register`. Returns the service acknowledgement.
    fn register(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// `POST /auth/login`. Returns the issued credential token.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// `GET /wallet/balance`.
    fn balance(&self) -> impl Future<Output = Result<f64, GatewayError>> + Send;

    /// `POST /wallet/deposit`.
    fn deposit(
        &self,
        amount: f64,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Receipt, GatewayError>> + Send;

    /// `POST /wallet/withdraw`.
    fn withdraw(
        &self,
        amount: f64,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Receipt, GatewayError>> + Send;

    /// `POST /wallet/transfer`.
    fn transfer(
        &self,
        receiver_username: &str,
        amount: f64,
        idempotency_key: &str,
    ) -> impl Future<Output = Result<Receipt, GatewayError>> + Send;

    /// `GET /wallet/transactions` -- the complete entry list.
    fn transactions(&self) -> impl Future<Output = Result<Vec<LedgerRecord>, GatewayError>> + Send;

    /// `GET /wallet/transactions/range` -- entries with timestamp in
    /// `[start, end]`; an absent bound means unbounded on that side.
    fn transactions_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<LedgerRecord>, GatewayError>> + Send;

    /// Registers a named listener fired on any unauthorized response.
    fn add_invalidation_listener(&self, name: &'static str, listener: Arc<dyn InvalidationListener>);

    /// Removes a named listener. Returns `true` if one was found.
    fn remove_invalidation_listener(&self, name: &'static str) -> bool;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = GatewayError::rejected("Insufficient funds.");
        assert_eq!(err.to_string(), "rejected: Insufficient funds.");
    }

    #[test]
    fn constructors_set_the_kind() {
        assert_eq!(GatewayError::unauthorized("x").kind, ErrorKind::Unauthorized);
        assert_eq!(GatewayError::rejected("x").kind, ErrorKind::Rejected);
        assert_eq!(GatewayError::network("x").kind, ErrorKind::Network);
    }
}
