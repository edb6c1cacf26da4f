//! Wire types for the ledger-service JSON API.
//!
//! Field names follow the service's camelCase payloads verbatim
//! (including the `preBalance`/`postBalance` running-balance pair), so
//! these types (de)serialize against the live service without any
//! translation layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `POST /auth/register` and `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Body for `POST /wallet/deposit` and `POST /wallet/withdraw`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest<'a> {
    pub amount: f64,
    pub idempotency_key: &'a str,
}

/// Body for `POST /wallet/transfer`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest<'a> {
    pub receiver_username: &'a str,
    pub amount: f64,
    pub idempotency_key: &'a str,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response to `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Response to `GET /wallet/balance`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceResponse {
    pub balance: f64,
}

/// The conventional `{"message": ...}` envelope.
///
/// Returned by the service both for plain acknowledgements (register)
/// and for error bodies; either way the `message` field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageEnvelope {
    #[serde(default)]
    pub message: Option<String>,
}

/// Response to a successful mutating wallet call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Receipt {
    /// Human-readable acknowledgement from the service.
    #[serde(default)]
    pub message: Option<String>,

    /// Updated balance, when the service includes it.
    #[serde(default)]
    pub balance: Option<f64>,
}

// ---------------------------------------------------------------------------
// Ledger entries
// ---------------------------------------------------------------------------

/// Classification of a balance-affecting event, as recorded remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Deposit,
    Withdrawal,
    TransferSent,
    TransferReceived,
}

/// One balance-affecting event returned by the remote service.
///
/// Immutable once fetched; the client replaces its entry list wholesale
/// on every refetch rather than merging incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    /// Server-assigned entry ID.
    pub id: i64,

    /// What kind of event this entry records.
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Absolute amount moved (always positive on the wire).
    pub amount: f64,

    /// When the event was recorded, service-local time.
    pub timestamp: NaiveDateTime,

    /// Sending party, for transfers.
    #[serde(default)]
    pub sender_username: Option<String>,

    /// Receiving party, for transfers.
    #[serde(default)]
    pub receiver_username: Option<String>,

    /// The user's balance before this event.
    #[serde(rename = "preBalance")]
    pub balance_before: f64,

    /// The user's balance after this event.
    #[serde(rename = "postBalance")]
    pub balance_after: f64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_record_deserializes_service_payload() {
        let json = r#"{
            "id": 42,
            "type": "TRANSFER_SENT",
            "amount": 40.00,
            "timestamp": "2024-01-15T10:30:00",
            "senderUsername": "alice",
            "receiverUsername": "bob",
            "preBalance": 100.00,
            "postBalance": 60.00
        }"#;

        let record: LedgerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.entry_type, EntryType::TransferSent);
        assert_eq!(record.amount, 40.0);
        assert_eq!(record.sender_username.as_deref(), Some("alice"));
        assert_eq!(record.receiver_username.as_deref(), Some("bob"));
        assert_eq!(record.balance_before, 100.0);
        assert_eq!(record.balance_after, 60.0);
    }

    #[test]
    fn deposit_record_tolerates_missing_parties() {
        let json = r#"{
            "id": 1,
            "type": "DEPOSIT",
            "amount": 25.50,
            "timestamp": "2024-02-01T08:00:00",
            "preBalance": 0.0,
            "postBalance": 25.50
        }"#;

        let record: LedgerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.entry_type, EntryType::Deposit);
        assert_eq!(record.sender_username, None);
        assert_eq!(record.receiver_username, None);
    }

    #[test]
    fn movement_request_uses_camel_case_key() {
        let body = MovementRequest {
            amount: 12.34,
            idempotency_key: "key-1",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["amount"], 12.34);
        assert_eq!(json["idempotencyKey"], "key-1");
    }

    #[test]
    fn transfer_request_names_the_receiver() {
        let body = TransferRequest {
            receiver_username: "bob",
            amount: 5.0,
            idempotency_key: "key-2",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["receiverUsername"], "bob");
    }

    #[test]
    fn entry_type_round_trips_screaming_snake_case() {
        for (variant, wire) in [
            (EntryType::Deposit, "\"DEPOSIT\""),
            (EntryType::Withdrawal, "\"WITHDRAWAL\""),
            (EntryType::TransferSent, "\"TRANSFER_SENT\""),
            (EntryType::TransferReceived, "\"TRANSFER_RECEIVED\""),
        ] {
            assert_eq!(serde_json::to_string(&variant).unwrap(), wire);
            assert_eq!(serde_json::from_str::<EntryType>(wire).unwrap(), variant);
        }
    }
}
