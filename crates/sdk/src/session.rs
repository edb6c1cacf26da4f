//! Authentication session state machine.
//!
//! The session is the client's current belief about whether the user is
//! authenticated. It starts [`AuthState::Unknown`] and leaves that state
//! exactly once, at [`WalletClient::initialize`], based purely on
//! credential *presence* -- no remote validation happens at startup, so
//! a stale token is trusted until the first 401 rejects it.
//!
//! Legal transitions:
//!
//! ```text
//! Unknown ----------------> Authenticated     initialize(), token present
//! Unknown ----------------> Unauthenticated   initialize(), slot empty
//! Unauthenticated --------> Authenticated     successful login()
//! Authenticated ----------> Unauthenticated   logout() / forced invalidation
//! ```
//!
//! Forced invalidation arrives through the gateway's invalidation
//! registry: any 401, from any in-flight call, lands in
//! [`SessionInvalidator`] and drives the state to Unauthenticated with a
//! cleared slot, overriding whatever operation triggered it.

use std::fmt;
use std::sync::{Arc, RwLock};

use storage::CredentialStore;
use tracing::{debug, warn};
use transport::{ErrorKind, Gateway, InvalidationListener};

use crate::{WalletClient, WalletError};

// ---------------------------------------------------------------------------
// Validation limits
// ---------------------------------------------------------------------------

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;
const PASSWORD_MIN: usize = 6;
const PASSWORD_MAX: usize = 40;

// ---------------------------------------------------------------------------
// AuthState
// ---------------------------------------------------------------------------

/// The client's belief about the user's authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// Startup check has not run yet.
    Unknown,
    /// No usable credential.
    Unauthenticated,
    /// A credential is present and not yet rejected.
    Authenticated,
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Snapshot of the authentication session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Current state-machine position.
    pub auth: AuthState,

    /// Identity of the logged-in user, when known.
    ///
    /// Populated by a successful login; a presence-based `initialize`
    /// cannot recover it, so it stays `None` until the next login.
    pub username: Option<String>,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            auth: AuthState::Unknown,
            username: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionInvalidator
// ---------------------------------------------------------------------------

/// Gateway listener that funnels 401s back into the session.
///
/// The gateway has already cleared the slot by the time this runs; the
/// clear here is a repeat for gateway implementations that only signal.
pub(crate) struct SessionInvalidator<C> {
    session: Arc<RwLock<Session>>,
    credentials: Arc<C>,
}

impl<C> SessionInvalidator<C> {
    pub(crate) fn new(session: Arc<RwLock<Session>>, credentials: Arc<C>) -> Self {
        Self {
            session,
            credentials,
        }
    }
}

impl<C: CredentialStore> InvalidationListener for SessionInvalidator<C> {
    fn on_session_invalidated(&self) {
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "credential_clear_failed");
        }
        let mut session = self.session.write().unwrap();
        session.auth = AuthState::Unauthenticated;
        session.username = None;
        warn!("session_force_invalidated");
    }
}

// ---------------------------------------------------------------------------
// Session operations
// ---------------------------------------------------------------------------

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// Determines the initial session state from credential presence.
    ///
    /// Local-only: the token is not validated against the service. Runs
    /// the `Unknown -> {Authenticated, Unauthenticated}` transition
    /// exactly once; later calls return the current state unchanged.
    pub fn initialize(&self) -> Result<AuthState, WalletError> {
        let mut session = self.inner.session.write().unwrap();
        if session.auth != AuthState::Unknown {
            debug!(state = %session.auth, "session_already_initialized");
            return Ok(session.auth);
        }

        let present = self.inner.credentials.get()?.is_some();
        session.auth = if present {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        debug!(state = %session.auth, "session_initialized");
        Ok(session.auth)
    }

    /// Authenticates against the service and stores the issued token.
    ///
    /// On failure the slot is cleared and the session lands in
    /// Unauthenticated, whatever state it was in before.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), WalletError> {
        self.check_cancelled()?;
        validate_login(username, password)?;

        match self.inner.gateway.login(username, password).await {
            Ok(token) => {
                self.inner.credentials.set(&token)?;
                let mut session = self.inner.session.write().unwrap();
                session.auth = AuthState::Authenticated;
                session.username = Some(username.to_owned());
                debug!(username, "login_succeeded");
                Ok(())
            }
            Err(e) => {
                if let Err(clear_err) = self.inner.credentials.clear() {
                    warn!(error = %clear_err, "credential_clear_failed");
                }
                let mut session = self.inner.session.write().unwrap();
                session.auth = AuthState::Unauthenticated;
                session.username = None;
                drop(session);

                debug!(username, error = %e, "login_failed");
                // A rejected login is a credentials problem, not an
                // expired session.
                Err(match e.kind {
                    ErrorKind::Network => WalletError::Network(e.message),
                    _ => WalletError::Credentials(e.message),
                })
            }
        }
    }

    /// Clears the credential and session unconditionally.
    ///
    /// No network call is made; idempotent.
    pub fn logout(&self) -> Result<(), WalletError> {
        self.inner.credentials.clear()?;
        let mut session = self.inner.session.write().unwrap();
        session.auth = AuthState::Unauthenticated;
        session.username = None;
        debug!("logged_out");
        Ok(())
    }

    /// Creates an account. Never alters the session state -- the user
    /// logs in explicitly afterwards.
    pub async fn register(&self, username: &str, password: &str) -> Result<String, WalletError> {
        self.check_cancelled()?;
        validate_registration(username, password)?;

        self.inner
            .gateway
            .register(username, password)
            .await
            .map_err(WalletError::from)
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.inner.session.read().unwrap().clone()
    }

    /// Current state-machine position.
    pub fn auth_state(&self) -> AuthState {
        self.inner.session.read().unwrap().auth
    }

    /// The logged-in username, when known.
    pub fn username(&self) -> Option<String> {
        self.inner.session.read().unwrap().username.clone()
    }
}

// ---------------------------------------------------------------------------
// Input validation
// ---------------------------------------------------------------------------

fn validate_login(username: &str, password: &str) -> Result<(), WalletError> {
    if username.trim().is_empty() {
        return Err(WalletError::Validation("Username is required".into()));
    }
    if password.is_empty() {
        return Err(WalletError::Validation("Password is required".into()));
    }
    Ok(())
}

fn validate_registration(username: &str, password: &str) -> Result<(), WalletError> {
    let username = username.trim();
    if username.len() < USERNAME_MIN {
        return Err(WalletError::Validation(format!(
            "Username must be at least {USERNAME_MIN} characters"
        )));
    }
    if username.len() > USERNAME_MAX {
        return Err(WalletError::Validation(format!(
            "Username must not exceed {USERNAME_MAX} characters"
        )));
    }
    if password.len() < PASSWORD_MIN {
        return Err(WalletError::Validation(format!(
            "Password must be at least {PASSWORD_MIN} characters"
        )));
    }
    if password.len() > PASSWORD_MAX {
        return Err(WalletError::Validation(format!(
            "Password must not exceed {PASSWORD_MAX} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
