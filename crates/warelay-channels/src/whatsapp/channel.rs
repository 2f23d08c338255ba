//! Channel trait implementation for WhatsApp.

use super::WhatsAppChannel;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;
use wacore_binary::jid::Jid;
use warelay_core::{
    error::RelayError,
    message::{ChannelEvent, OutgoingMessage},
    traits::Channel,
};

/// Parse a chat JID (`phone@s.whatsapp.net`, `id@g.us`).
pub(super) fn parse_jid(jid_str: &str) -> Result<Jid, RelayError> {
    jid_str
        .parse()
        .map_err(|e| RelayError::Channel(format!("invalid whatsapp JID '{jid_str}': {e}")))
}

impl WhatsAppChannel {
    /// Send a text message to a JID string.
    async fn send_text(&self, jid_str: &str, text: &str) -> Result<(), RelayError> {
        let jid = parse_jid(jid_str)?;
        // Clone the handle out so concurrent replies don't serialize on the lock.
        let client = self
            .client
            .lock()
            .await
            .clone()
            .ok_or_else(|| RelayError::Channel("whatsapp client not connected".into()))?;

        let msg = waproto::whatsapp::Message {
            conversation: Some(text.to_string()),
            ..Default::default()
        };
        let msg_id = client
            .send_message(jid, msg)
            .await
            .map_err(|e| RelayError::Channel(format!("whatsapp send failed: {e}")))?;
        self.sent_ids.lock().await.record(msg_id);

        Ok(())
    }
}

#[async_trait]
impl Channel for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    async fn start(&self) -> Result<mpsc::Receiver<ChannelEvent>, RelayError> {
        let (tx, rx) = mpsc::channel(64);
        self.build_and_run_bot(tx).await?;
        info!("WhatsApp channel started");
        Ok(rx)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<(), RelayError> {
        self.send_text(&message.reply_target, &message.text).await
    }

    async fn stop(&self) -> Result<(), RelayError> {
        self.shutdown_bot().await;
        info!("WhatsApp channel stopped");
        Ok(())
    }
}
