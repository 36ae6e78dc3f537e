//! Session lifecycle core.
//!
//! Owns everything between the wire boundary and the callers: the
//! per-account credential store, the pairing-code rendezvous, the
//! singleton-connection registry, and the outbound message pipeline.
//! Exactly one live connection exists per account; the registry map is the
//! sole source of truth for "is this account connected".

pub mod outbound;
pub mod pairing;
pub mod registry;
pub mod store;

#[allow(clippy::unwrap_used)]
#[cfg(test)]
pub(crate) mod testing;

pub use registry::{
    ConnectOutcome, HANDLER_GRACE, RECONNECT_DELAY, RESTORE_TIMEOUT, SessionRegistry,
};
pub use store::{CredentialStore, StoreError};
