//! Inbound event forwarding.
//!
//! The dispatcher attaches to each live connection (after the registry's
//! grace period), filters self-sent traffic, persists media attachments
//! under the upload root and forwards event metadata to the configured
//! webhook. Delivery is best-effort: failures are logged and dropped.

pub mod dispatcher;
pub mod webhook;

pub use dispatcher::EventDispatcher;
pub use webhook::{HookClient, HookPayload};
