use std::{path::PathBuf, sync::Arc};

use {
    async_trait::async_trait,
    tracing::{debug, warn},
};

use {
    wagate_common::{InboundEvent, InboundKind, MediaRef, address},
    wagate_wire::{EventSink, WireClient},
};

use crate::webhook::HookClient;

/// Consumes a connection's inbound event stream and forwards each event to
/// the webhook, persisting media attachments along the way.
pub struct EventDispatcher {
    hook: HookClient,
    upload_root: PathBuf,
}

#[async_trait]
impl EventSink for EventDispatcher {
    async fn attach(&self, account_id: &str, client: Arc<dyn WireClient>) {
        let Some(mut events) = client.take_events() else {
            warn!(account = account_id, "event stream already taken");
            return;
        };
        while let Some(event) = events.recv().await {
            self.handle(account_id, &client, event).await;
        }
        debug!(account = account_id, "event stream closed");
    }
}

impl EventDispatcher {
    pub fn new(hook: HookClient, upload_root: impl Into<PathBuf>) -> Self {
        Self {
            hook,
            upload_root: upload_root.into(),
        }
    }

    async fn handle(&self, account_id: &str, client: &Arc<dyn WireClient>, event: InboundEvent) {
        if event.from_me || !self.hook.enabled() {
            return;
        }

        let from = address::clear_address(&event.from);
        let to = address::clear_address(&event.to);
        let name = event.sender_name.as_str();

        match event.kind {
            InboundKind::Text { body } => {
                self.hook.deliver(&from, &to, name, "text", &body, "").await;
            },
            InboundKind::Location {
                latitude,
                longitude,
            } => {
                let body = format!("{latitude},{longitude}");
                self.hook
                    .deliver(&from, &to, name, "location", &body, "")
                    .await;
            },
            InboundKind::Image { caption, media } => {
                let file_name = format!("{}.jpg", event.id);
                if self
                    .store_media(account_id, "images", &file_name, client, &media)
                    .await
                {
                    self.hook
                        .deliver(&from, &to, name, "image", &caption, &file_name)
                        .await;
                }
            },
            InboundKind::Video { caption, media } => {
                let file_name = format!("{}.mp4", event.id);
                if self
                    .store_media(account_id, "videos", &file_name, client, &media)
                    .await
                {
                    self.hook
                        .deliver(&from, &to, name, "video", &caption, &file_name)
                        .await;
                }
            },
            InboundKind::Document {
                file_name,
                title,
                media,
            } => {
                let file_name = if file_name.is_empty() {
                    event.id.clone()
                } else {
                    file_name
                };
                if self
                    .store_media(account_id, "documents", &file_name, client, &media)
                    .await
                {
                    self.hook
                        .deliver(&from, &to, name, "document", &title, &file_name)
                        .await;
                }
            },
        }
    }

    /// Download and persist one attachment. Any failure logs and aborts
    /// delivery for this event; there is no retry.
    async fn store_media(
        &self,
        account_id: &str,
        subdir: &str,
        file_name: &str,
        client: &Arc<dyn WireClient>,
        media: &MediaRef,
    ) -> bool {
        let data = match client.download(media).await {
            Ok(data) => data,
            Err(e) => {
                warn!(account = account_id, error = %e, "attachment download failed");
                return false;
            },
        };
        let dir = self.upload_root.join(account_id).join(subdir);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(account = account_id, error = %e, "cannot create media directory");
            return false;
        }
        if let Err(e) = std::fs::write(dir.join(file_name), data) {
            warn!(account = account_id, error = %e, "cannot write attachment");
            return false;
        }
        debug!(account = account_id, file_name, "attachment stored");
        true
    }
}
