//! Client error types.
//!
//! [`WalletError`] is the unified error type for all client operations.
//! Every variant carries (or is) a displayable message: remote failures
//! are normalized to strings at the gateway boundary and pass through
//! here untouched, so callers display `to_string()` and re-enable the
//! triggering control -- no automatic recovery or retry exists in this
//! layer.

use std::fmt;

use transport::{ErrorKind, GatewayError};

// ---------------------------------------------------------------------------
// WalletError
// ---------------------------------------------------------------------------

/// Errors from wallet client operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Local validation failed before any dispatch (bad amount, missing
    /// counterparty, malformed registration input).
    Validation(String),

    /// The service rejected a login attempt.
    Credentials(String),

    /// A 401 was observed on some call; the session has been force-
    /// invalidated and the stored credential cleared.
    SessionExpired(String),

    /// The service refused a transaction on business grounds
    /// (insufficient funds, unknown recipient, and the like).
    Transaction(String),

    /// Transport failure with no structured message available.
    Network(String),

    /// The credential slot backend failed.
    Storage(String),

    /// The client has been shut down.
    Cancelled,
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(message)
            | Self::Credentials(message)
            | Self::SessionExpired(message)
            | Self::Transaction(message)
            | Self::Network(message)
            | Self::Storage(message) => write!(f, "{message}"),
            Self::Cancelled => write!(f, "client shut down"),
        }
    }
}

impl std::error::Error for WalletError {}

/// Default mapping from normalized gateway failures.
///
/// `login` overrides the `Unauthorized` arm at its call site -- a
/// rejected login is a credentials problem, not an expired session.
impl From<GatewayError> for WalletError {
    fn from(e: GatewayError) -> Self {
        match e.kind {
            ErrorKind::Unauthorized => Self::SessionExpired(e.message),
            ErrorKind::Rejected => Self::Transaction(e.message),
            ErrorKind::Network => Self::Network(e.message),
        }
    }
}

impl From<storage::StorageError> for WalletError {
    fn from(e: storage::StorageError) -> Self {
        Self::Storage(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = WalletError::Transaction("Insufficient funds".into());
        assert_eq!(err.to_string(), "Insufficient funds");
    }

    #[test]
    fn gateway_errors_map_by_kind() {
        assert_eq!(
            WalletError::from(GatewayError::unauthorized("expired")),
            WalletError::SessionExpired("expired".into())
        );
        assert_eq!(
            WalletError::from(GatewayError::rejected("no such user")),
            WalletError::Transaction("no such user".into())
        );
        assert_eq!(
            WalletError::from(GatewayError::network("timed out")),
            WalletError::Network("timed out".into())
        );
    }
}
