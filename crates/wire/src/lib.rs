//! Wire boundary.
//!
//! The binary protocol and cryptographic handshake with the chat network
//! belong to an external connection library. This crate pins down everything
//! the gateway needs from it: a connector that performs the handshake, a
//! client handle for one live session, typed error classification, and the
//! opaque credential material that survives restarts.

mod client;
mod credential;
mod error;

pub use client::{ClientIdentity, EventSink, OutboundPayload, WireClient, WireConnector};
pub use credential::{Credential, ProtocolVersion};
pub use error::WireError;
