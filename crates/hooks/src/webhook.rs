use {
    serde::Serialize,
    tracing::{debug, warn},
};

use wagate_config::HookConfig;

/// JSON body of one webhook call. Authentication is the shared secret
/// echoed in every payload, not per-request signing.
#[derive(Debug, Clone, Serialize)]
pub struct HookPayload {
    pub secret: String,
    /// Receiving account id.
    pub to: String,
    /// Sender id.
    pub from: String,
    /// Sender display name, empty when unknown.
    pub name: String,
    pub message_type: String,
    pub message: String,
    /// Stored attachment file name, empty for text and location.
    pub file_name: String,
}

/// Fire-and-forget webhook delivery.
#[derive(Debug, Clone)]
pub struct HookClient {
    config: HookConfig,
    http: reqwest::Client,
}

impl HookClient {
    pub fn new(config: HookConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled()
    }

    /// POST one event to the hook endpoint. Best-effort: transport errors
    /// are logged, non-2xx responses are noted but not treated specially.
    pub async fn deliver(
        &self,
        from: &str,
        to: &str,
        name: &str,
        message_type: &str,
        message: &str,
        file_name: &str,
    ) {
        if !self.enabled() {
            return;
        }
        let payload = HookPayload {
            secret: self.config.secret.clone(),
            to: to.to_string(),
            from: from.to_string(),
            name: name.to_string(),
            message_type: message_type.to_string(),
            message: message.to_string(),
            file_name: file_name.to_string(),
        };
        match self.http.post(&self.config.url).json(&payload).send().await {
            Ok(resp) if !resp.status().is_success() => {
                debug!(status = %resp.status(), message_type, "webhook returned non-success");
            },
            Ok(_) => {},
            Err(e) => warn!(error = %e, message_type, "webhook delivery failed"),
        }
    }
}
