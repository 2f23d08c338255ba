use crate::{
    error::RelayError,
    message::{ChannelEvent, OutgoingMessage},
};
use async_trait::async_trait;

/// Chat-completion backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Send a single user prompt and return the assistant's reply text.
    async fn complete(&self, prompt: &str) -> Result<String, RelayError>;
}

/// Messaging channel.
///
/// Implementations must be safe to `send` from several tasks at once.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Connect and start delivering events.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<ChannelEvent>, RelayError>;

    /// Send a plain-text reply.
    async fn send(&self, message: OutgoingMessage) -> Result<(), RelayError>;

    /// Disconnect.
    async fn stop(&self) -> Result<(), RelayError>;
}
