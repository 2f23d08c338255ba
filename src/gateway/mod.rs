//! Gateway: routes inbound chat events to the completion provider and
//! sends the reformatted answer back to the originating chat.

mod routing;


pub use routing::{extract_prompt, TRIGGER};

use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};
use warelay_core::{
    format::html_to_chat,
    message::{ChannelEvent, InboundMessage, OutgoingMessage},
    traits::{Channel, Provider},
};

/// Shows a pairing code to the operator.
pub type CodeDisplay = Arc<dyn Fn(&str) + Send + Sync>;

/// The relay: one provider, one channel, no state between events.
pub struct Gateway {
    provider: Arc<dyn Provider>,
    channel: Arc<dyn Channel>,
    show_code: CodeDisplay,
}

impl Gateway {
    pub fn new(provider: Arc<dyn Provider>, channel: Arc<dyn Channel>) -> Self {
        Self {
            provider,
            channel,
            show_code: Arc::new(crate::bootstrap::show_pairing_code),
        }
    }

    /// Replace how pairing codes arriving after startup are shown.
    pub fn with_code_display(mut self, show_code: CodeDisplay) -> Self {
        self.show_code = show_code;
        self
    }

    /// Handle events until `shutdown` resolves or the event stream closes,
    /// then stop the channel.
    ///
    /// Each event runs on its own task, so slow completions overlap. Tasks
    /// still in flight at shutdown are detached, not cancelled.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::Receiver<ChannelEvent>,
        shutdown: impl Future<Output = ()>,
    ) -> anyhow::Result<()> {
        info!(
            "warelay gateway running | provider: {} | channel: {} | trigger: {TRIGGER:?}",
            self.provider.name(),
            self.channel.name(),
        );

        tokio::pin!(shutdown);
        let mut in_flight = JoinSet::new();

        loop {
            tokio::select! {
                maybe_event = events.recv() => match maybe_event {
                    Some(event) => {
                        let gw = self.clone();
                        in_flight.spawn(async move { gw.handle_event(event).await });
                    }
                    None => {
                        warn!("{} event stream closed", self.channel.name());
                        while in_flight.join_next().await.is_some() {}
                        break;
                    }
                },
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                () = &mut shutdown => {
                    info!("Received shutdown signal");
                    in_flight.detach_all();
                    break;
                }
            }
        }

        if let Err(e) = self.channel.stop().await {
            error!("failed to stop {}: {e}", self.channel.name());
        }
        Ok(())
    }

    /// Handle one channel event to completion.
    pub async fn handle_event(&self, event: ChannelEvent) {
        match event {
            ChannelEvent::Message(message) => self.handle_message(message).await,
            ChannelEvent::PairingCode(code) => {
                warn!("{} session needs re-pairing, scan the new code", self.channel.name());
                (self.show_code)(&code);
            }
            other => debug!("{} event: {}", self.channel.name(), other.kind()),
        }
    }

    async fn handle_message(&self, message: InboundMessage) {
        let Some(prompt) = extract_prompt(&message.text) else {
            return;
        };

        info!("trigger from {}", message.sender_id);

        let answer = match self.provider.complete(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                // The user gets no reply on failure.
                error!("completion failed: {e}");
                return;
            }
        };

        let reply = OutgoingMessage {
            text: html_to_chat(&answer),
            reply_target: message.chat_id,
        };
        if let Err(e) = self.channel.send(reply).await {
            error!("failed to send reply via {}: {e}", self.channel.name());
        }
    }
}

/// Wait for SIGINT (ctrl-c) or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .unwrap_or_else(|e| error!("ctrl-c handler failed: {e}"));
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("SIGTERM handler unavailable, relying on ctrl-c: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c"),
        () = terminate => info!("received SIGTERM"),
    }
}
