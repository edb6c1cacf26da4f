//! Wallet service protocol constants.
//!
//! These constants define client-level parameters for endpoints, timeouts,
//! and view windowing.

/// Default ledger-service base URL (local development backend).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Environment variable that overrides the base URL.
///
/// When set, [`crate::ServiceConfig::from_env`] uses its value verbatim
/// (minus any trailing slash).
pub const BASE_URL_ENV: &str = "WALLET_API_BASE_URL";

/// Default connection timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Number of ledger entries shown in the dashboard summary window.
pub const SUMMARY_WINDOW: usize = 5;

/// Wire format for date-range query parameters (`YYYY-MM-DD`).
pub const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Name of the persisted credential slot.
///
/// File-backed credential stores use this as the file name; it matches
/// the slot name the original web client kept in browser storage.
pub const CREDENTIAL_SLOT: &str = "jwt_token";
