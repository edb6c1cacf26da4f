//! Ledger reconciliation view-model.
//!
//! Holds the per-user entry list fetched from the service and derives
//! the display fields a presentation layer renders: direction-aware
//! labels, signed amounts, credit/debit tones, and the counterparty
//! relative to the current user.
//!
//! # Staleness
//!
//! Concurrent fetches have no defined completion order, so every fetch
//! is tagged with a monotonically increasing generation number and a
//! resolving fetch that has been superseded by a later-issued one is
//! discarded instead of applied. A fetch that resolves after the session
//! left Authenticated (logout, forced invalidation) is likewise
//! discarded. The previously displayed list survives failed fetches --
//! the view is only ever replaced wholesale by an applied result.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::NaiveDate;
use config::constants::SUMMARY_WINDOW;
use storage::CredentialStore;
use tracing::debug;
use transport::{EntryType, Gateway, LedgerRecord};

use crate::session::AuthState;
use crate::{WalletClient, WalletError};

// ---------------------------------------------------------------------------
// Display projection
// ---------------------------------------------------------------------------

/// Rendering tone for a projected amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Money in: rendered in the credit color.
    Credit,
    /// Money out: rendered in the debit color.
    Debit,
}

impl Tone {
    /// The style class a renderer attaches to the amount.
    pub const fn as_class(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

const LABEL_DEPOSIT: &str = "DEPOSIT";
const LABEL_WITHDRAWAL: &str = "WITHDRAWAL";
const LABEL_TRANSFER_SENT: &str = "TRANSFER SENT";
const LABEL_TRANSFER_RECEIVED: &str = "TRANSFER RECEIVED";

/// A ledger entry projected for one user's screen.
///
/// Derived from a [`LedgerRecord`] plus the current username; recomputed
/// on every render and never cached across a session-identity change.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayEntry {
    /// Direction-aware label ("DEPOSIT", "TRANSFER SENT", ...).
    pub label: &'static str,

    /// Amount signed from the current user's perspective.
    pub signed_amount: f64,

    /// Credit or debit rendering tone.
    pub tone: Tone,

    /// The other party of a transfer, relative to the current user.
    pub counterparty: Option<String>,

    /// Running balance before the event.
    pub balance_before: f64,

    /// Running balance after the event.
    pub balance_after: f64,
}

/// Projects a ledger entry for the given user.
///
/// Deposits and withdrawals ignore any party fields present. For
/// transfers, an entry whose recorded direction disagrees with the
/// current user's position (the sender of a `TRANSFER_SENT` is someone
/// else) is treated as the opposite direction rather than rendered
/// wrong-way -- the service writes one row per affected user, so a
/// mismatch means the row was recorded from the other side.
pub fn project_for_user(record: &LedgerRecord, current_username: &str) -> DisplayEntry {
    let base = |label, signed_amount, tone, counterparty: Option<String>| DisplayEntry {
        label,
        signed_amount,
        tone,
        counterparty,
        balance_before: record.balance_before,
        balance_after: record.balance_after,
    };

    let sent = || {
        base(
            LABEL_TRANSFER_SENT,
            -record.amount,
            Tone::Debit,
            record.receiver_username.clone(),
        )
    };
    let received = || {
        base(
            LABEL_TRANSFER_RECEIVED,
            record.amount,
            Tone::Credit,
            record.sender_username.clone(),
        )
    };

    match record.entry_type {
        EntryType::Deposit => base(LABEL_DEPOSIT, record.amount, Tone::Credit, None),
        EntryType::Withdrawal => base(LABEL_WITHDRAWAL, -record.amount, Tone::Debit, None),
        EntryType::TransferSent => {
            if record.sender_username.as_deref() == Some(current_username) {
                sent()
            } else {
                received()
            }
        }
        EntryType::TransferReceived => {
            if record.receiver_username.as_deref() == Some(current_username) {
                received()
            } else {
                sent()
            }
        }
    }
}

/// Fixed two-decimal currency rendering.
pub fn format_currency(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", -value)
    } else {
        format!("${value:.2}")
    }
}

// ---------------------------------------------------------------------------
// Sorting and windowing
// ---------------------------------------------------------------------------

/// Sorts entries newest-first.
///
/// Stable: entries with equal timestamps keep their original relative
/// order.
pub fn sort_descending_by_timestamp(mut entries: Vec<LedgerRecord>) -> Vec<LedgerRecord> {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

// ---------------------------------------------------------------------------
// LedgerView
// ---------------------------------------------------------------------------

/// What happened to a resolved fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The result replaced the view.
    Applied,
    /// A later-issued fetch already applied; this result was dropped.
    Superseded,
    /// The session left Authenticated before the result could apply.
    Discarded,
}

/// The current entry list plus the generation bookkeeping.
pub(crate) struct LedgerView {
    entries: RwLock<Vec<LedgerRecord>>,
    issued: AtomicU64,
    applied: AtomicU64,
}

impl LedgerView {
    pub(crate) fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
        }
    }

    /// Tags a new fetch with the next generation number.
    pub(crate) fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Applies a resolved fetch unless a later one got there first.
    pub(crate) fn try_apply(&self, generation: u64, records: Vec<LedgerRecord>) -> bool {
        let mut entries = self.entries.write().unwrap();
        if generation <= self.applied.load(Ordering::Acquire) {
            return false;
        }
        self.applied.store(generation, Ordering::Release);
        *entries = records;
        true
    }

    pub(crate) fn snapshot(&self) -> Vec<LedgerRecord> {
        self.entries.read().unwrap().clone()
    }
}

// ---------------------------------------------------------------------------
// Fetch operations
// ---------------------------------------------------------------------------

impl<G, C> WalletClient<G, C>
where
    G: Gateway,
    C: CredentialStore + 'static,
{
    /// Replaces the view with the complete entry list.
    pub async fn refresh_all(&self) -> Result<RefreshOutcome, WalletError> {
        self.check_cancelled()?;
        let generation = self.inner.ledger.begin();
        let records = self.inner.gateway.transactions().await?;
        Ok(self.apply_fetch(generation, records))
    }

    /// Replaces the view with entries whose timestamp falls in
    /// `[start, end]`. An absent bound is unbounded on that side.
    pub async fn refresh_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<RefreshOutcome, WalletError> {
        self.check_cancelled()?;
        let generation = self.inner.ledger.begin();
        let records = self.inner.gateway.transactions_range(start, end).await?;
        Ok(self.apply_fetch(generation, records))
    }

    fn apply_fetch(&self, generation: u64, records: Vec<LedgerRecord>) -> RefreshOutcome {
        if self.auth_state() != AuthState::Authenticated {
            debug!(generation, "ledger_refresh_discarded");
            return RefreshOutcome::Discarded;
        }
        if self.inner.ledger.try_apply(generation, records) {
            debug!(generation, "ledger_refresh_applied");
            RefreshOutcome::Applied
        } else {
            debug!(generation, "ledger_refresh_superseded");
            RefreshOutcome::Superseded
        }
    }

    /// The current entry list, in service order.
    pub fn entries(&self) -> Vec<LedgerRecord> {
        self.inner.ledger.snapshot()
    }

    /// The current entry list, newest-first.
    pub fn history(&self) -> Vec<LedgerRecord> {
        sort_descending_by_timestamp(self.inner.ledger.snapshot())
    }

    /// The summary window: the first [`SUMMARY_WINDOW`] entries of the
    /// sorted list.
    pub fn recent(&self) -> Vec<LedgerRecord> {
        let mut sorted = self.history();
        sorted.truncate(SUMMARY_WINDOW);
        sorted
    }

    /// Projects an entry for the currently logged-in user.
    ///
    /// Falls back to an empty username when the session identity is
    /// unknown (presence-based startup), in which case transfers render
    /// from the recorded direction.
    pub fn project(&self, record: &LedgerRecord) -> DisplayEntry {
        let username = self.username().unwrap_or_default();
        project_for_user(record, &username)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn record(id: i64, entry_type: EntryType, amount: f64, timestamp: &str) -> LedgerRecord {
        LedgerRecord {
            id,
            entry_type,
            amount,
            timestamp: NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S").unwrap(),
            sender_username: None,
            receiver_username: None,
            balance_before: 0.0,
            balance_after: 0.0,
        }
    }

    fn transfer(
        id: i64,
        entry_type: EntryType,
        sender: &str,
        receiver: &str,
        amount: f64,
    ) -> LedgerRecord {
        LedgerRecord {
            sender_username: Some(sender.to_owned()),
            receiver_username: Some(receiver.to_owned()),
            ..record(id, entry_type, amount, "2024-03-01T12:00:00")
        }
    }

    #[test]
    fn deposit_projects_credit_without_counterparty() {
        // Party fields present on a deposit must be ignored.
        let entry = transfer(1, EntryType::Deposit, "alice", "bob", 25.0);
        let display = project_for_user(&entry, "alice");

        assert_eq!(display.label, "DEPOSIT");
        assert_eq!(display.signed_amount, 25.0);
        assert_eq!(display.tone, Tone::Credit);
        assert_eq!(display.counterparty, None);
    }

    #[test]
    fn withdrawal_projects_debit_without_counterparty() {
        let entry = record(2, EntryType::Withdrawal, 10.0, "2024-03-01T09:00:00");
        let display = project_for_user(&entry, "alice");

        assert_eq!(display.label, "WITHDRAWAL");
        assert_eq!(display.signed_amount, -10.0);
        assert_eq!(display.tone, Tone::Debit);
        assert_eq!(display.counterparty, None);
    }

    #[test]
    fn transfer_sent_by_current_user() {
        let entry = transfer(3, EntryType::TransferSent, "alice", "bob", 40.0);
        let display = project_for_user(&entry, "alice");

        assert_eq!(display.label, "TRANSFER SENT");
        assert_eq!(display.signed_amount, -40.0);
        assert_eq!(display.tone, Tone::Debit);
        assert_eq!(display.counterparty.as_deref(), Some("bob"));
    }

    #[test]
    fn transfer_sent_recorded_from_the_other_side() {
        // Row says TRANSFER_SENT but the current user is the receiver:
        // render it as received.
        let entry = transfer(4, EntryType::TransferSent, "alice", "bob", 40.0);
        let display = project_for_user(&entry, "bob");

        assert_eq!(display.label, "TRANSFER RECEIVED");
        assert_eq!(display.signed_amount, 40.0);
        assert_eq!(display.tone, Tone::Credit);
        assert_eq!(display.counterparty.as_deref(), Some("alice"));
    }

    #[test]
    fn transfer_received_by_current_user() {
        let entry = transfer(5, EntryType::TransferReceived, "alice", "bob", 15.0);
        let display = project_for_user(&entry, "bob");

        assert_eq!(display.label, "TRANSFER RECEIVED");
        assert_eq!(display.signed_amount, 15.0);
        assert_eq!(display.counterparty.as_deref(), Some("alice"));
    }

    #[test]
    fn transfer_received_recorded_from_the_other_side() {
        let entry = transfer(6, EntryType::TransferReceived, "alice", "bob", 15.0);
        let display = project_for_user(&entry, "alice");

        assert_eq!(display.label, "TRANSFER SENT");
        assert_eq!(display.signed_amount, -15.0);
        assert_eq!(display.tone, Tone::Debit);
        assert_eq!(display.counterparty.as_deref(), Some("bob"));
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let t1 = record(1, EntryType::Deposit, 1.0, "2024-01-01T00:00:00");
        let t3 = record(3, EntryType::Deposit, 3.0, "2024-03-01T00:00:00");
        let t2a = record(21, EntryType::Deposit, 2.0, "2024-02-01T00:00:00");
        let t2b = record(22, EntryType::Deposit, 2.0, "2024-02-01T00:00:00");

        let sorted =
            sort_descending_by_timestamp(vec![t1.clone(), t3.clone(), t2a.clone(), t2b.clone()]);

        let ids: Vec<i64> = sorted.iter().map(|e| e.id).collect();
        // Newest first; the two equal timestamps keep insertion order.
        assert_eq!(ids, vec![3, 21, 22, 1]);
    }

    #[test]
    fn generation_guard_rejects_stale_applications() {
        let view = LedgerView::new();
        let first = view.begin();
        let second = view.begin();

        assert!(view.try_apply(second, vec![record(1, EntryType::Deposit, 1.0, "2024-01-01T00:00:00")]));
        // The earlier-issued fetch resolves afterwards: dropped.
        assert!(!view.try_apply(first, Vec::new()));

        assert_eq!(view.snapshot().len(), 1);
    }

    #[test]
    fn generations_apply_in_issue_order_when_resolved_in_order() {
        let view = LedgerView::new();
        let first = view.begin();
        let second = view.begin();

        assert!(view.try_apply(first, Vec::new()));
        assert!(view.try_apply(second, vec![record(1, EntryType::Deposit, 1.0, "2024-01-01T00:00:00")]));
        assert_eq!(view.snapshot().len(), 1);
    }

    #[test]
    fn format_currency_is_fixed_two_decimals() {
        assert_eq!(format_currency(100.0), "$100.00");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(-40.0), "-$40.00");
    }
}
