//! Translation of protocol events into relay events.

use super::sent::SentIds;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use wacore::types::events::Event;
use warelay_core::message::{ChannelEvent, InboundMessage};

/// Map a protocol event to a relay event. `None` means "nothing to deliver".
pub(super) async fn translate(
    event: Event,
    sent_ids: &Arc<Mutex<SentIds>>,
) -> Option<ChannelEvent> {
    match event {
        Event::PairingQrCode { code, .. } => Some(ChannelEvent::PairingCode(code)),
        Event::PairSuccess(_) => Some(ChannelEvent::Paired),
        Event::Connected(_) => Some(ChannelEvent::Other("connected")),
        Event::Disconnected(_) => Some(ChannelEvent::Other("disconnected")),
        Event::LoggedOut(_) => Some(ChannelEvent::Other("logged_out")),
        Event::ConnectFailure(_) => Some(ChannelEvent::Other("connect_failure")),
        Event::Message(msg, info) => {
            if info.source.is_from_me && sent_ids.lock().await.take(&info.id) {
                debug!("skipping own echo: {}", info.id);
                return None;
            }
            let text = conversation_text(&msg)?;
            Some(ChannelEvent::Message(InboundMessage {
                id: info.id.clone(),
                sender_id: info.source.sender.user.clone(),
                chat_id: info.source.chat.to_string(),
                text: text.to_string(),
            }))
        }
        _ => None,
    }
}

/// Plain conversation text of a message, looking through the
/// device-sent / ephemeral / view-once wrappers.
///
/// Only the `conversation` payload counts: media, reactions and extended
/// text messages yield `None`.
pub(super) fn conversation_text(msg: &waproto::whatsapp::Message) -> Option<&str> {
    let inner = msg
        .device_sent_message
        .as_ref()
        .and_then(|d| d.message.as_deref())
        .or_else(|| {
            msg.ephemeral_message
                .as_ref()
                .and_then(|e| e.message.as_deref())
        })
        .or_else(|| {
            msg.view_once_message
                .as_ref()
                .and_then(|v| v.message.as_deref())
        })
        .unwrap_or(msg);

    inner.conversation.as_deref()
}
