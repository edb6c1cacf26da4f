//! Wallet client SDK: sessions, transactions, and ledger reconciliation.
//!
//! The SDK orchestrates wallet operations against a remote ledger service
//! by combining:
//!
//! - **Transport** ([`transport::Gateway`]) for service communication
//! - **Credential slot** ([`storage::CredentialStore`]) for the persisted
//!   session token
//! - **Session** ([`session`]) for the authentication state machine
//! - **Gate** ([`gate`]) for route-level access decisions
//! - **Operations** ([`operations`]) for validated, idempotent submission
//! - **Ledger view** ([`ledger`]) for the per-user reconciled entry list
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use config::ServiceConfig;
//! use sdk::WalletClient;
//! use storage::InMemoryCredentialStore;
//! use tokio_util::sync::CancellationToken;
//! use transport::HttpGateway;
//!
//! # async fn example() -> Result<(), sdk::WalletError> {
//! let credentials = Arc::new(InMemoryCredentialStore::new());
//! let gateway = HttpGateway::new(ServiceConfig::from_env(), credentials.clone())?;
//! let cancel = CancellationToken::new();
//!
//! let client = WalletClient::new(gateway, credentials, cancel.clone());
//! client.initialize()?;
//!
//! // Client is Clone -- share across tasks.
//! let client2 = client.clone();
//!
//! // Graceful shutdown.
//! cancel.cancel();
//! # Ok(())
//! # }
//! ```

pub mod amount;
pub mod error;
pub mod gate;
pub mod ledger;
pub mod operations;
pub mod session;

pub use amount::{Amount, AmountError};
pub use error::WalletError;
pub use gate::GateDecision;
pub use ledger::{DisplayEntry, RefreshOutcome, Tone};
pub use operations::{IdempotencyKey, TransactionKind, TransactionRequest};
pub use session::{AuthState, Session};

use std::sync::{Arc, RwLock};

use storage::CredentialStore;
use tokio_util::sync::CancellationToken;
use transport::Gateway;

use crate::ledger::LedgerView;
use crate::session::SessionInvalidator;

/// Name under which the session registers its invalidation listener.
const SESSION_LISTENER: &str = "session";

// ---------------------------------------------------------------------------
// WalletClient
// ---------------------------------------------------------------------------

/// Shared state across all client operations.
pub(crate) struct ClientInner<G, C> {
    pub(crate) gateway: G,
    pub(crate) credentials: Arc<C>,
    pub(crate) session: Arc<RwLock<Session>>,
    pub(crate) ledger: LedgerView,
    pub(crate) cancel: CancellationToken,
}

/// The wallet client entry point.
///
/// `Clone`-able (wraps an `Arc` of shared state). Generic over the
/// gateway and the credential store so both seams can be substituted
/// with test doubles.
///
/// # Type Parameters
///
/// - `G`: remote gateway ([`transport::HttpGateway`] in production)
/// - `C`: credential slot ([`storage::InMemoryCredentialStore`] or
///   [`storage::FileCredentialStore`])
pub struct WalletClient<G, C> {
    pub(crate) inner: Arc<ClientInner<G, C>>,
}

// Manual Clone: we don't require G or C to be Clone.
impl<G, C> Clone for WalletClient<G, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G, C> std::fmt::Debug for WalletClient<G, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletClient")
            .field("session", &*self.inner.session.read().unwrap())
            .finish()
    }
}

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// Creates a new client.
    ///
    /// Registers the session's invalidation listener on the gateway so
    /// that a 401 observed by any in-flight call force-invalidates the
    /// session, whatever operation triggered it. No network I/O happens
    /// during construction.
    pub fn new(gateway: G, credentials: Arc<C>, cancel: CancellationToken) -> Self {
        let session = Arc::new(RwLock::new(Session::new()));

        gateway.add_invalidation_listener(
            SESSION_LISTENER,
            Arc::new(SessionInvalidator::new(session.clone(), credentials.clone())),
        );

        Self {
            inner: Arc::new(ClientInner {
                gateway,
                credentials,
                session,
                ledger: LedgerView::new(),
                cancel,
            }),
        }
    }

    /// Returns a reference to the cancellation token.
    pub fn cancel(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    /// Shuts the client down: operations entered afterwards fail fast
    /// with [`WalletError::Cancelled`]. In-flight calls complete, but
    /// resolved fetches no longer apply once the session resets.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    /// Checks whether the client has been shut down.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Returns [`WalletError::Cancelled`] if the cancellation token has
    /// fired.
    pub(crate) fn check_cancelled(&self) -> Result<(), WalletError> {
        if self.inner.cancel.is_cancelled() {
            Err(WalletError::Cancelled)
        } else {
            Ok(())
        }
    }
}
