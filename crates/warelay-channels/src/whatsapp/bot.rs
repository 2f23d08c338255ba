//! Bot lifecycle: building, running, and stopping the WhatsApp bot.

use super::events::translate;
use super::WhatsAppChannel;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use wacore::types::events::Event;
use warelay_core::{error::RelayError, message::ChannelEvent};
use whatsapp_rust::bot::Bot;
use whatsapp_rust_tokio_transport::TokioWebSocketTransportFactory;
use whatsapp_rust_ureq_http_client::UreqHttpClient;

impl WhatsAppChannel {
    /// Build the bot on top of the opened store, register the event
    /// translator, and run it in the background.
    pub(super) async fn build_and_run_bot(
        &self,
        tx: mpsc::Sender<ChannelEvent>,
    ) -> Result<(), RelayError> {
        let client_handle = self.client.clone();
        let sent_ids = self.sent_ids.clone();

        info!("WhatsApp bot building (device: {})...", self.config.device_name);

        let mut bot = Bot::builder()
            .with_backend(self.store.clone())
            .with_transport_factory(TokioWebSocketTransportFactory::new())
            .with_http_client(UreqHttpClient::new())
            .with_device_props(
                Some(self.config.device_name.clone()),
                None,
                Some(waproto::whatsapp::device_props::PlatformType::Desktop),
            )
            .on_event(move |event, client| {
                let tx = tx.clone();
                let client_store = client_handle.clone();
                let sent_ids = sent_ids.clone();
                async move {
                    match &event {
                        Event::Connected(_) => {
                            info!("WhatsApp connected");
                            *client_store.lock().await = Some(client);
                        }
                        Event::PairSuccess(_) => info!("WhatsApp pairing successful"),
                        Event::Disconnected(_) => {
                            warn!("WhatsApp disconnected");
                            *client_store.lock().await = None;
                        }
                        Event::LoggedOut(_) => {
                            warn!("WhatsApp logged out, session invalidated");
                            *client_store.lock().await = None;
                        }
                        _ => {}
                    }

                    if let Some(relay_event) = translate(event, &sent_ids).await {
                        if tx.send(relay_event).await.is_err() {
                            info!("whatsapp event receiver dropped");
                        }
                    }
                }
            })
            .build()
            .await
            .map_err(|e| RelayError::Bootstrap(format!("whatsapp bot build failed: {e}")))?;

        *self.client.lock().await = Some(bot.client());

        let handle = bot
            .run()
            .await
            .map_err(|e| RelayError::Bootstrap(format!("whatsapp bot run failed: {e}")))?;
        *self.bot_task.lock().await = Some(handle);

        info!("WhatsApp bot started");
        Ok(())
    }

    /// Disconnect the client and stop the bot task.
    pub(super) async fn shutdown_bot(&self) {
        if let Some(client) = self.client.lock().await.take() {
            client.disconnect().await;
        }
        if let Some(handle) = self.bot_task.lock().await.take() {
            handle.abort();
        }
    }
}
