use serde::{Deserialize, Serialize};

/// Reference to an earlier message, attached when replying with a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quoted {
    pub id: String,
    pub text: String,
}

/// Payload-specific body of an outbound message.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text {
        body: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
    Image {
        data: Vec<u8>,
        mime: String,
        caption: String,
    },
    Video {
        data: Vec<u8>,
        mime: String,
        caption: String,
    },
    Document {
        data: Vec<u8>,
        mime: String,
        file_name: String,
    },
}

impl MessageContent {
    /// Wire-level type tag, also used in webhook payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Location { .. } => "location",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Document { .. } => "document",
        }
    }
}

/// One outbound message, addressed by its bare destination id.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    /// Bare destination id; suffix resolution happens at send time.
    pub to: String,
    pub quoted: Option<Quoted>,
    /// Deliberate pacing delay before transmission, in seconds.
    pub delay_secs: u64,
    pub content: MessageContent,
}

impl OutboundMessage {
    pub fn text(to: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            quoted: None,
            delay_secs: 0,
            content: MessageContent::Text { body: body.into() },
        }
    }

    pub fn with_quote(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.quoted = Some(Quoted {
            id: id.into(),
            text: text.into(),
        });
        self
    }

    pub fn with_delay(mut self, delay_secs: u64) -> Self {
        self.delay_secs = delay_secs;
        self
    }
}

/// Opaque handle to a downloadable attachment held by the wire layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRef {
    pub id: String,
    pub mime: String,
}

/// Kind-specific body of an inbound event.
#[derive(Debug, Clone)]
pub enum InboundKind {
    Text {
        body: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
    Image {
        caption: String,
        media: MediaRef,
    },
    Video {
        caption: String,
        media: MediaRef,
    },
    Document {
        file_name: String,
        title: String,
        media: MediaRef,
    },
}

impl InboundKind {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Location { .. } => "location",
            Self::Image { .. } => "image",
            Self::Video { .. } => "video",
            Self::Document { .. } => "document",
        }
    }
}

/// One inbound event delivered by a live connection.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    /// Network-unique event id, used to name stored media.
    pub id: String,
    /// Sender address (may still carry a domain suffix).
    pub from: String,
    /// Receiving account's own address.
    pub to: String,
    /// True when the account itself sent this message from another device.
    pub from_me: bool,
    /// Sender display name, empty when unknown.
    pub sender_name: String,
    pub kind: InboundKind,
}
