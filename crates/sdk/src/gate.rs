//! Route-level access gating.
//!
//! Maps the session state to exactly one rendering decision for a
//! protected view. The gate itself has no side effects; the caller
//! performs whatever navigation the decision names.

use storage::CredentialStore;
use transport::Gateway;

use crate::session::AuthState;
use crate::WalletClient;

// ---------------------------------------------------------------------------
// GateDecision
// ---------------------------------------------------------------------------

/// What a protected view should do right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The startup check has not completed: render a neutral placeholder.
    /// Neither the protected content nor a redirect -- protected UI must
    /// not flash before the check resolves.
    Pending,

    /// Not authenticated: navigate to the entry view. `replace` means the
    /// current navigation entry is replaced, so back-navigation cannot
    /// land on the protected view.
    RedirectToEntry { replace: bool },

    /// Authenticated: render the protected content.
    Grant,
}

/// The gating rule, as a pure function of session state.
pub fn decide(auth: AuthState) -> GateDecision {
    match auth {
        AuthState::Unknown => GateDecision::Pending,
        AuthState::Unauthenticated => GateDecision::RedirectToEntry { replace: true },
        AuthState::Authenticated => GateDecision::Grant,
    }
}

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// Gate decision for the current session.
    pub fn gate(&self) -> GateDecision {
        decide(self.auth_state())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_renders_placeholder() {
        assert_eq!(decide(AuthState::Unknown), GateDecision::Pending);
    }

    #[test]
    fn unauthenticated_redirects_with_replace() {
        assert_eq!(
            decide(AuthState::Unauthenticated),
            GateDecision::RedirectToEntry { replace: true }
        );
    }

    #[test]
    fn authenticated_grants() {
        assert_eq!(decide(AuthState::Authenticated), GateDecision::Grant);
    }
}
