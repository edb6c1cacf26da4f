//! HTTP gateway for the ledger service.
//!
//! [`HttpGateway`] is a connection-pooled reqwest client that implements
//! the [`Gateway`] contract over the service's JSON routes. The
//! underlying `reqwest::Client` multiplexes connections internally, so
//! there is no runtime pool management here.
//!
//! # Error normalization
//!
//! The service reports failures either as a `{"message": ...}` envelope
//! or as a bare JSON string; both shapes are collapsed into
//! [`GatewayError`] at this boundary (see [`extract_message`]). Every
//! route carries its own fallback message for bodies that yield nothing.

use std::sync::Arc;

use chrono::NaiveDate;
use config::constants::RANGE_DATE_FORMAT;
use config::ServiceConfig;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use storage::CredentialStore;
use tracing::{debug, error, warn};

use crate::gateway::{Gateway, GatewayError};
use crate::invalidation::{InvalidationListener, InvalidationRegistry};
use crate::wire::{
    AuthRequest, BalanceResponse, LedgerRecord, LoginResponse, MessageEnvelope, MovementRequest,
    Receipt, TransferRequest,
};

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

const AUTH_REGISTER: &str = "/auth/register";
const AUTH_LOGIN: &str = "/auth/login";
const WALLET_BALANCE: &str = "/wallet/balance";
const WALLET_DEPOSIT: &str = "/wallet/deposit";
const WALLET_WITHDRAW: &str = "/wallet/withdraw";
const WALLET_TRANSFER: &str = "/wallet/transfer";
const WALLET_TRANSACTIONS: &str = "/wallet/transactions";
const WALLET_TRANSACTIONS_RANGE: &str = "/wallet/transactions/range";

// ---------------------------------------------------------------------------
// Fallback messages
// ---------------------------------------------------------------------------

const MSG_REGISTER_FAILED: &str = "Registration failed. Please try again.";
const MSG_REGISTER_OK: &str = "Registration successful. Please log in.";
const MSG_LOGIN_FAILED: &str = "Login failed. Please check your username and password.";
const MSG_BALANCE_FAILED: &str = "Failed to fetch balance.";
const MSG_DEPOSIT_FAILED: &str = "Deposit failed. Please try again.";
const MSG_WITHDRAW_FAILED: &str = "Withdrawal failed. Please try again.";
const MSG_TRANSFER_FAILED: &str = "Transfer failed. Please try again.";
const MSG_TRANSACTIONS_FAILED: &str = "Failed to fetch ledger entries.";
const MSG_RANGE_FAILED: &str = "Failed to fetch ledger entries by date range.";
const MSG_SESSION_EXPIRED: &str = "Session expired. Please log in again.";
const MSG_UNEXPECTED: &str = "An unexpected error occurred.";

// ---------------------------------------------------------------------------
// HttpGateway
// ---------------------------------------------------------------------------

/// Reqwest-backed [`Gateway`] implementation.
///
/// Generic over the credential store so the same slot instance can be
/// shared with the session layer (the gateway only reads it -- except on
/// 401, where it clears it per the contract).
pub struct HttpGateway<C> {
    client: reqwest::Client,
    config: ServiceConfig,
    credentials: Arc<C>,
    listeners: InvalidationRegistry,
}

impl<C: CredentialStore> HttpGateway<C> {
    /// Creates a gateway against `config`, sharing `credentials` with
    /// the caller. No network I/O happens during construction.
    pub fn new(config: ServiceConfig, credentials: Arc<C>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GatewayError::network(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            config,
            credentials,
            listeners: InvalidationRegistry::new(),
        })
    }

    /// The service configuration this gateway talks to.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url(), path)
    }

    /// Attaches the stored credential as a bearer header, when present.
    ///
    /// A failing credential read is treated as an absent token: the
    /// request proceeds unauthenticated and the service's 401 handling
    /// takes over from there.
    fn with_credential(&self, request: RequestBuilder) -> RequestBuilder {
        match self.credentials.get() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                warn!(error = %e, "credential_read_failed");
                request
            }
        }
    }

    /// Clears the slot and notifies listeners. Runs on every 401.
    fn handle_unauthorized(&self) {
        warn!("gateway_unauthorized");
        if let Err(e) = self.credentials.clear() {
            warn!(error = %e, "credential_clear_failed");
        }
        self.listeners.fire();
    }

    /// Sends a prepared request and normalizes the outcome.
    async fn execute<T: DeserializeOwned>(
        &self,
        route: &'static str,
        request: RequestBuilder,
        default_msg: &'static str,
    ) -> Result<T, GatewayError> {
        debug!(route, "gateway_request");

        let response = self.with_credential(request).send().await.map_err(|e| {
            error!(route, error = %e, "gateway_send_failed");
            GatewayError::network(MSG_UNEXPECTED)
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            let body = response.bytes().await.unwrap_or_default();
            self.handle_unauthorized();
            return Err(GatewayError::unauthorized(extract_message(
                &body,
                MSG_SESSION_EXPIRED,
            )));
        }

        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let message = extract_message(&body, default_msg);
            error!(route, status = %status, message = %message, "gateway_status_error");
            return Err(if status.is_client_error() {
                GatewayError::rejected(message)
            } else {
                GatewayError::network(message)
            });
        }

        response.json::<T>().await.map_err(|e| {
            error!(route, error = %e, "gateway_decode_failed");
            GatewayError::network(MSG_UNEXPECTED)
        })
    }
}

impl<C: CredentialStore> Gateway for HttpGateway<C> {
    async fn register(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let request = self
            .client
            .post(self.url(AUTH_REGISTER))
            .json(&AuthRequest { username, password });
        let ack: MessageEnvelope = self
            .execute(AUTH_REGISTER, request, MSG_REGISTER_FAILED)
            .await?;
        Ok(ack.message.unwrap_or_else(|| MSG_REGISTER_OK.to_owned()))
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, GatewayError> {
        let request = self
            .client
            .post(self.url(AUTH_LOGIN))
            .json(&AuthRequest { username, password });
        let response: LoginResponse = self.execute(AUTH_LOGIN, request, MSG_LOGIN_FAILED).await?;
        Ok(response.token)
    }

    async fn balance(&self) -> Result<f64, GatewayError> {
        let request = self.client.get(self.url(WALLET_BALANCE));
        let response: BalanceResponse = self
            .execute(WALLET_BALANCE, request, MSG_BALANCE_FAILED)
            .await?;
        Ok(response.balance)
    }

    async fn deposit(&self, amount: f64, idempotency_key: &str) -> Result<Receipt, GatewayError> {
        let request = self.client.post(self.url(WALLET_DEPOSIT)).json(&MovementRequest {
            amount,
            idempotency_key,
        });
        self.execute(WALLET_DEPOSIT, request, MSG_DEPOSIT_FAILED)
            .await
    }

    async fn withdraw(&self, amount: f64, idempotency_key: &str) -> Result<Receipt, GatewayError> {
        let request = self
            .client
            .post(self.url(WALLET_WITHDRAW))
            .json(&MovementRequest {
                amount,
                idempotency_key,
            });
        self.execute(WALLET_WITHDRAW, request, MSG_WITHDRAW_FAILED)
            .await
    }

    async fn transfer(
        &self,
        receiver_username: &str,
        amount: f64,
        idempotency_key: &str,
    ) -> Result<Receipt, GatewayError> {
        let request = self
            .client
            .post(self.url(WALLET_TRANSFER))
            .json(&TransferRequest {
                receiver_username,
                amount,
                idempotency_key,
            });
        self.execute(WALLET_TRANSFER, request, MSG_TRANSFER_FAILED)
            .await
    }

    async fn transactions(&self) -> Result<Vec<LedgerRecord>, GatewayError> {
        let request = self.client.get(self.url(WALLET_TRANSACTIONS));
        self.execute(WALLET_TRANSACTIONS, request, MSG_TRANSACTIONS_FAILED)
            .await
    }

    async fn transactions_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<LedgerRecord>, GatewayError> {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(date) = start {
            params.push(("startDate", date.format(RANGE_DATE_FORMAT).to_string()));
        }
        if let Some(date) = end {
            params.push(("endDate", date.format(RANGE_DATE_FORMAT).to_string()));
        }

        let request = self
            .client
            .get(self.url(WALLET_TRANSACTIONS_RANGE))
            .query(&params);
        self.execute(WALLET_TRANSACTIONS_RANGE, request, MSG_RANGE_FAILED)
            .await
    }

    fn add_invalidation_listener(
        &self,
        name: &'static str,
        listener: Arc<dyn InvalidationListener>,
    ) {
        self.listeners.add(name, listener);
    }

    fn remove_invalidation_listener(&self, name: &'static str) -> bool {
        self.listeners.remove(name)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Pulls a displayable message out of an error body.
///
/// The service usually answers with `{"message": "..."}`, but some
/// handlers return a bare JSON string. Anything else falls back to the
/// route's default.
fn extract_message(body: &[u8], default: &str) -> String {
    if let Ok(envelope) = serde_json::from_slice::<MessageEnvelope>(body) {
        if let Some(message) = envelope.message {
            if !message.trim().is_empty() {
                return message;
            }
        }
    }
    if let Ok(text) = serde_json::from_slice::<String>(body) {
        if !text.trim().is_empty() {
            return text;
        }
    }
    default.to_owned()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryCredentialStore;

    #[test]
    fn extract_message_reads_the_envelope() {
        let body = br#"{"message": "Insufficient funds"}"#;
        assert_eq!(extract_message(body, "fallback"), "Insufficient funds");
    }

    #[test]
    fn extract_message_reads_a_bare_string() {
        let body = br#""Recipient not found""#;
        assert_eq!(extract_message(body, "fallback"), "Recipient not found");
    }

    #[test]
    fn extract_message_falls_back_on_garbage() {
        assert_eq!(extract_message(b"<html>502</html>", "fallback"), "fallback");
        assert_eq!(extract_message(b"", "fallback"), "fallback");
        assert_eq!(extract_message(br#"{"message": ""}"#, "fallback"), "fallback");
    }

    #[test]
    fn urls_join_base_and_route() {
        let gateway = HttpGateway::new(
            ServiceConfig::new("http://localhost:8080/api"),
            Arc::new(InMemoryCredentialStore::new()),
        )
        .unwrap();
        assert_eq!(
            gateway.url(WALLET_TRANSACTIONS),
            "http://localhost:8080/api/wallet/transactions"
        );
    }

    #[test]
    fn construction_does_no_io() {
        // An unroutable base URL must still construct fine.
        let gateway = HttpGateway::new(
            ServiceConfig::new("http://203.0.113.1:1"),
            Arc::new(InMemoryCredentialStore::new()),
        );
        assert!(gateway.is_ok());
    }
}
