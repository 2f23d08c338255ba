use serde::{Deserialize, Serialize};

/// A plain-text chat message delivered by a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Platform message ID.
    pub id: String,
    /// Platform-specific sender ID (e.g. a phone number).
    pub sender_id: String,
    /// Chat the message arrived in; replies are routed back here.
    pub chat_id: String,
    /// Conversation text.
    pub text: String,
}

/// Events a channel delivers to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Message(InboundMessage),
    /// Pairing payload to render as a scannable code.
    PairingCode(String),
    /// Device pairing completed.
    Paired,
    /// Any other protocol event, by kind name.
    Other(&'static str),
}

impl ChannelEvent {
    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::PairingCode(_) => "code",
            Self::Paired => "success",
            Self::Other(kind) => kind,
        }
    }
}

/// A reply to send back through a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub text: String,
    /// Platform-specific target for routing (e.g. a WhatsApp chat JID).
    pub reply_target: String,
}
