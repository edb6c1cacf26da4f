//! Wallet operations against the remote service.

pub mod balance;
pub mod submit;

pub use submit::{IdempotencyKey, TransactionKind, TransactionRequest};
