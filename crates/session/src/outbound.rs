//! Outbound message pipeline.
//!
//! Every kind goes through the same steps: registry lookup, destination
//! suffix resolution, quoted-reference attachment, the configured pacing
//! delay, transmit, classify. A send deadline on the wire is downgraded to
//! success with whatever id the transport produced; a closed transport
//! evicts the account so the next connect starts clean.

use std::time::Duration;

use tracing::{debug, warn};

use {
    wagate_common::{GatewayError, OutboundMessage, address},
    wagate_wire::{OutboundPayload, WireError},
};

use crate::registry::SessionRegistry;

impl SessionRegistry {
    /// Transmit one message for the account. Returns the network-assigned
    /// message id (possibly empty when the wire deadline elapsed).
    pub async fn send(
        &self,
        account_id: &str,
        message: OutboundMessage,
    ) -> Result<String, GatewayError> {
        if message.to.is_empty() {
            return Err(GatewayError::Validation(
                "destination id is required".to_string(),
            ));
        }

        let client = self
            .client_for(account_id)
            .await
            .ok_or(GatewayError::ConnectionInvalid)?;

        let payload = OutboundPayload {
            to: address::resolve_destination(&message.to),
            quoted: message.quoted,
            content: message.content,
        };

        // Deliberate pacing, not a timeout.
        if message.delay_secs > 0 {
            debug!(
                account = account_id,
                delay_secs = message.delay_secs,
                "delaying transmission"
            );
            tokio::time::sleep(Duration::from_secs(message.delay_secs)).await;
        }

        match client.send(payload).await {
            Ok(id) => Ok(id),
            Err(WireError::SendTimeout(id)) => {
                warn!(account = account_id, "send deadline elapsed, assuming delivery");
                Ok(id)
            },
            Err(WireError::TransportClosed) => {
                self.evict(account_id).await;
                Err(GatewayError::ConnectionInvalid)
            },
            Err(e) => Err(GatewayError::Protocol(e.to_string())),
        }
    }
}
