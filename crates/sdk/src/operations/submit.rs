//! Transaction submission pipeline.
//!
//! Every submission follows the same path: validate locally, mint a
//! fresh idempotency key, dispatch to the route for the kind, and hand
//! the service receipt back untouched. No retry, no optimistic balance
//! mutation -- the caller refetches the ledger view after a success.

use std::fmt;

use storage::CredentialStore;
use tracing::debug;
use transport::{Gateway, Receipt};
use uuid::Uuid;

use crate::amount::Amount;
use crate::{WalletClient, WalletError};

const MSG_RECIPIENT_REQUIRED: &str = "Recipient username is required";

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// The kind of mutating wallet operation being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "deposit"),
            Self::Withdraw => write!(f, "withdraw"),
            Self::Transfer => write!(f, "transfer"),
        }
    }
}

// ---------------------------------------------------------------------------
// IdempotencyKey
// ---------------------------------------------------------------------------

/// Opaque token the ledger uses to deduplicate retried submissions.
///
/// Minted fresh per submission *attempt*: a caller that retries a
/// logical action after a timeout mints a new key, so the service sees
/// two distinct submissions. Callers that need action-level
/// deduplication must hold on to a request and resubmit it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(Uuid);

impl IdempotencyKey {
    /// Mints a new unique key.
    pub fn mint() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TransactionRequest
// ---------------------------------------------------------------------------

/// A validated submission, ready for dispatch.
///
/// Ephemeral: built per attempt, dropped after the response. Holding an
/// instance is the only way to resubmit with the same idempotency key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub amount: Amount,
    /// Non-empty exactly when `kind` is [`TransactionKind::Transfer`].
    pub counterparty: Option<String>,
    pub idempotency_key: IdempotencyKey,
}

impl TransactionRequest {
    /// Validates raw input into a dispatchable request.
    ///
    /// Failures are [`WalletError::Validation`] and never reach the
    /// network. A fresh idempotency key is minted on success.
    pub fn build(
        kind: TransactionKind,
        amount: f64,
        counterparty: Option<&str>,
    ) -> Result<Self, WalletError> {
        let amount =
            Amount::from_f64(amount).map_err(|e| WalletError::Validation(e.to_string()))?;

        let counterparty = match kind {
            TransactionKind::Transfer => {
                let name = counterparty
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| WalletError::Validation(MSG_RECIPIENT_REQUIRED.into()))?;
                Some(name.to_owned())
            }
            _ => None,
        };

        Ok(Self {
            kind,
            amount,
            counterparty,
            idempotency_key: IdempotencyKey::mint(),
        })
    }
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// Validates and dispatches one transaction.
    ///
    /// On success the receipt is returned as-is; the caller triggers a
    /// ledger refresh to see the effect. On failure nothing is retried
    /// and no local state moves.
    pub async fn submit(
        &self,
        kind: TransactionKind,
        amount: f64,
        counterparty: Option<&str>,
    ) -> Result<Receipt, WalletError> {
        self.check_cancelled()?;
        let request = TransactionRequest::build(kind, amount, counterparty)?;
        self.dispatch(request).await
    }

    /// Dispatches an already-validated request.
    pub async fn dispatch(&self, request: TransactionRequest) -> Result<Receipt, WalletError> {
        self.check_cancelled()?;

        let key = request.idempotency_key.to_string();
        debug!(
            kind = %request.kind,
            amount = %request.amount,
            key = %key,
            "transaction_submit"
        );

        let amount = request.amount.to_major();
        let result = match request.kind {
            TransactionKind::Deposit => self.inner.gateway.deposit(amount, &key).await,
            TransactionKind::Withdraw => self.inner.gateway.withdraw(amount, &key).await,
            TransactionKind::Transfer => {
                // Non-empty by construction for transfers.
                let receiver = request.counterparty.as_deref().unwrap_or_default();
                self.inner.gateway.transfer(receiver, amount, &key).await
            }
        };

        result.map_err(WalletError::from)
    }

    /// Deposits `amount` into the wallet.
    pub async fn deposit(&self, amount: f64) -> Result<Receipt, WalletError> {
        self.submit(TransactionKind::Deposit, amount, None).await
    }

    /// Withdraws `amount` from the wallet.
    pub async fn withdraw(&self, amount: f64) -> Result<Receipt, WalletError> {
        self.submit(TransactionKind::Withdraw, amount, None).await
    }

    /// Transfers `amount` to `receiver`.
    pub async fn transfer(&self, amount: f64, receiver: &str) -> Result<Receipt, WalletError> {
        self.submit(TransactionKind::Transfer, amount, Some(receiver))
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_bad_amounts() {
        for bad in [-5.0, 0.0, f64::NAN, 40.555] {
            let result = TransactionRequest::build(TransactionKind::Deposit, bad, None);
            assert!(matches!(result, Err(WalletError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn build_requires_a_recipient_for_transfers() {
        for missing in [None, Some(""), Some("   ")] {
            let result = TransactionRequest::build(TransactionKind::Transfer, 10.0, missing);
            assert!(matches!(result, Err(WalletError::Validation(_))));
        }
    }

    #[test]
    fn build_ignores_counterparty_for_movements() {
        let request =
            TransactionRequest::build(TransactionKind::Deposit, 10.0, Some("bob")).unwrap();
        assert_eq!(request.counterparty, None);
    }

    #[test]
    fn build_trims_the_recipient() {
        let request =
            TransactionRequest::build(TransactionKind::Transfer, 10.0, Some("  bob ")).unwrap();
        assert_eq!(request.counterparty.as_deref(), Some("bob"));
    }

    #[test]
    fn each_build_mints_a_distinct_key() {
        let a = TransactionRequest::build(TransactionKind::Deposit, 1.0, None).unwrap();
        let b = TransactionRequest::build(TransactionKind::Deposit, 1.0, None).unwrap();
        assert_ne!(a.idempotency_key, b.idempotency_key);
    }

    #[test]
    fn keys_display_as_opaque_tokens() {
        let key = IdempotencyKey::mint();
        let text = key.to_string();
        assert_eq!(text.len(), 36);
        assert_eq!(text, key.to_string());
    }
}
