//! Shared gateway types.
//!
//! Message and event payloads exchanged between the session registry, the
//! wire boundary and the hook dispatcher, plus the public error taxonomy
//! and chat-address helpers.

pub mod address;
pub mod error;
pub mod types;

pub use error::GatewayError;
pub use types::{InboundEvent, InboundKind, MediaRef, MessageContent, OutboundMessage, Quoted};
