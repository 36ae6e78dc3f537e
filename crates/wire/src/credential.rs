use serde::{Deserialize, Serialize};

/// Session secret material returned by a successful login or restore.
///
/// Opaque to the gateway: it is persisted as-is and handed back to the
/// connection library to resume a session without re-pairing. Field layout
/// follows the network's session envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub client_id: String,
    pub client_token: String,
    pub server_token: String,
    pub enc_key: Vec<u8>,
    pub mac_key: Vec<u8>,
    /// The account's own network address.
    pub wid: String,
}

/// Protocol version negotiated during the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolVersion(pub u32, pub u32, pub u32);

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}
