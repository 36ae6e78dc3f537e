use std::{sync::Arc, time::Duration};

use {
    async_trait::async_trait,
    tokio::sync::{mpsc, oneshot},
};

use {
    wagate_common::{InboundEvent, MediaRef, MessageContent, Quoted},
    wagate_config::ClientConfig,
};

use crate::{Credential, ProtocolVersion, WireError};

/// Client identity announced to the network during the handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub long_name: String,
    pub short_name: String,
}

impl From<ClientConfig> for ClientIdentity {
    fn from(config: ClientConfig) -> Self {
        Self {
            long_name: config.long_name,
            short_name: config.short_name,
        }
    }
}

/// A fully addressed outbound payload, ready for the transport.
///
/// Unlike [`wagate_common::OutboundMessage`] the destination here is already
/// domain-qualified and the pacing delay has been consumed by the sender.
#[derive(Debug, Clone)]
pub struct OutboundPayload {
    pub to: String,
    pub quoted: Option<Quoted>,
    pub content: MessageContent,
}

/// Factory for live connections. One handshake per call.
#[async_trait]
pub trait WireConnector: Send + Sync {
    /// Open a transport to the chat network, announce `identity` and
    /// complete the handshake within `timeout`. The returned client is not
    /// yet authenticated; follow up with [`WireClient::login`] or
    /// [`WireClient::restore`].
    async fn connect(
        &self,
        identity: &ClientIdentity,
        timeout: Duration,
    ) -> Result<Arc<dyn WireClient>, WireError>;
}

/// One live logical session to the chat network.
#[async_trait]
pub trait WireClient: Send + Sync {
    /// Negotiate the protocol version with the server and record it.
    async fn sync_version(&self) -> Result<ProtocolVersion, WireError>;

    /// Start a fresh pairing. The raw pairing-code text is delivered on
    /// `code_tx` as soon as the server issues it; the call itself resolves
    /// once the code is scanned (or the attempt fails).
    async fn login(&self, code_tx: oneshot::Sender<String>) -> Result<Credential, WireError>;

    /// Resume a previous session from persisted credentials. Returns the
    /// refreshed credential to persist in its place.
    async fn restore(&self, credential: Credential) -> Result<Credential, WireError>;

    /// Terminate the session on the network side.
    async fn logout(&self) -> Result<(), WireError>;

    /// Transmit one payload. Returns the network-assigned message id.
    async fn send(&self, payload: OutboundPayload) -> Result<String, WireError>;

    /// Administrative liveness probe (round trip to the paired device).
    async fn admin_ping(&self) -> Result<(), WireError>;

    /// Fetch and decrypt an inbound attachment.
    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>, WireError>;

    /// Hand over the inbound event stream. Yields `Some` exactly once;
    /// subsequent calls return `None`.
    fn take_events(&self) -> Option<mpsc::UnboundedReceiver<InboundEvent>>;

    /// Hand over the transport-failure signal, firing when the connection
    /// drops out from under the session. Yields `Some` exactly once, like
    /// [`Self::take_events`]. A dropped sender means orderly shutdown, not
    /// failure.
    fn take_failure(&self) -> Option<oneshot::Receiver<WireError>>;

    /// The authenticated account's own network address, empty before login.
    fn self_id(&self) -> String;
}

/// Attachment seam for inbound event handling.
///
/// The registry calls this once per established connection, after the
/// post-connect grace period; the dispatcher side takes the event stream and
/// owns it from there.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn attach(&self, account_id: &str, client: Arc<dyn WireClient>);
}
