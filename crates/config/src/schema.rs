use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WagateConfig {
    pub server: ServerConfig,
    pub client: ClientConfig,
    pub hook: HookConfig,
}

/// Filesystem roots owned by the gateway process.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory holding one credential blob per account.
    pub store_path: PathBuf,
    /// Directory receiving downloaded inbound media.
    pub upload_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("data/store"),
            upload_path: PathBuf::from("data/upload"),
        }
    }
}

/// Client identity announced to the chat network during the handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub long_name: String,
    pub short_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            long_name: "Wagate".to_string(),
            short_name: "Wagate".to_string(),
        }
    }
}

/// Inbound-event webhook endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Target URL. Empty disables forwarding entirely.
    pub url: String,
    /// Shared secret echoed in every webhook payload.
    pub secret: String,
}

impl HookConfig {
    pub fn enabled(&self) -> bool {
        !self.url.is_empty()
    }
}
