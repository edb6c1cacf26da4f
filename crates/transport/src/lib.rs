//! Transport layer for the wallet client.
//!
//! Provides the [`Gateway`] contract -- typed route methods against the
//! remote ledger service -- and [`HttpGateway`], the reqwest-backed
//! implementation.
//!
//! The gateway owns three cross-cutting concerns so orchestration code
//! never sees raw HTTP:
//!
//! - **Credential injection**: the stored token is attached to every
//!   outgoing request as an `Authorization: Bearer` header when present.
//! - **Error normalization**: every failure becomes a
//!   [`GatewayError`]`{ kind, message }`, with the message extracted from
//!   the service's conventional `{"message": ...}` envelope when present.
//! - **401 interception**: an unauthorized response from *any* route
//!   clears the credential slot and fires the [`invalidation`] listener
//!   registry, independent of the call site.

pub mod gateway;
pub mod http;
pub mod invalidation;
pub mod wire;

pub use gateway::{ErrorKind, Gateway, GatewayError};
pub use http::HttpGateway;
pub use invalidation::{InvalidationListener, InvalidationRegistry};
pub use wire::{EntryType, LedgerRecord, Receipt};
