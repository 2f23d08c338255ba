//! Session bootstrap: resume a stored WhatsApp device or pair a new one.

use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};
use warelay_channels::whatsapp::{render_qr_terminal, WhatsAppChannel};
use warelay_core::{error::RelayError, message::ChannelEvent, traits::Channel};

/// How long a stored session may take to come online.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Connect the channel and return its event stream.
///
/// With a stored identity the client reconnects and must report a live
/// connection within [`CONNECT_TIMEOUT`]. Without one, pairing codes are
/// rendered to the terminal until the phone confirms the link.
pub async fn establish(
    channel: &WhatsAppChannel,
) -> Result<mpsc::Receiver<ChannelEvent>, RelayError> {
    let has_identity = channel.has_identity().await?;
    let mut events = channel.start().await?;

    if has_identity {
        info!("resuming stored WhatsApp session");
        if let Err(e) = await_connection(&mut events, CONNECT_TIMEOUT).await {
            // The client retries in the background; stop it before giving up.
            let _ = channel.stop().await;
            return Err(e);
        }
        return Ok(events);
    }

    info!("no stored device identity, waiting for pairing");
    await_pairing(&mut events, show_pairing_code).await?;
    Ok(events)
}

/// Print a pairing code as a terminal QR, or raw if it cannot be encoded.
pub fn show_pairing_code(code: &str) {
    match render_qr_terminal(code) {
        Ok(qr) => println!("{qr}"),
        Err(e) => {
            warn!("cannot render pairing code: {e}");
            println!("QR code: {code}");
        }
    }
}

/// Wait for a resumed session to report it is connected.
///
/// A disconnect, logout or connect failure first is fatal, as is the stream
/// closing or `timeout` elapsing.
pub async fn await_connection(
    events: &mut mpsc::Receiver<ChannelEvent>,
    timeout: Duration,
) -> Result<(), RelayError> {
    let wait = async {
        while let Some(event) = events.recv().await {
            match event {
                ChannelEvent::Other("connected") => return Ok(()),
                ChannelEvent::Other(kind @ ("disconnected" | "logged_out" | "connect_failure")) => {
                    return Err(RelayError::Bootstrap(format!(
                        "stored session could not connect: {kind}"
                    )));
                }
                other => info!("Login event: {}", other.kind()),
            }
        }
        Err(RelayError::Bootstrap(
            "event stream closed before the session connected".into(),
        ))
    };

    tokio::time::timeout(timeout, wait).await.map_err(|_| {
        RelayError::Bootstrap(format!("no connection within {}s", timeout.as_secs()))
    })?
}

/// Consume events until pairing succeeds, showing every pairing code.
///
/// Other events are reported and skipped. The stream ending first is fatal.
pub async fn await_pairing<F>(
    events: &mut mpsc::Receiver<ChannelEvent>,
    mut show_code: F,
) -> Result<(), RelayError>
where
    F: FnMut(&str),
{
    while let Some(event) = events.recv().await {
        match event {
            ChannelEvent::PairingCode(code) => show_code(&code),
            ChannelEvent::Paired => {
                println!("Login event: success");
                return Ok(());
            }
            other => println!("Login event: {}", other.kind()),
        }
    }
    Err(RelayError::Bootstrap(
        "event stream closed before pairing completed".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pairing_shows_codes_until_paired() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(ChannelEvent::PairingCode("2@first".into()))
            .await
            .unwrap();
        tx.send(ChannelEvent::Other("connected")).await.unwrap();
        tx.send(ChannelEvent::PairingCode("2@second".into()))
            .await
            .unwrap();
        tx.send(ChannelEvent::Paired).await.unwrap();
        tx.send(ChannelEvent::Other("after")).await.unwrap();

        let mut shown = Vec::new();
        await_pairing(&mut rx, |code| shown.push(code.to_string()))
            .await
            .unwrap();

        assert_eq!(shown, vec!["2@first", "2@second"]);
        // Events after pairing stay queued for the gateway.
        assert_eq!(rx.recv().await, Some(ChannelEvent::Other("after")));
    }

    #[tokio::test]
    async fn test_connection_ready_on_connected() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(ChannelEvent::Other("offline_sync")).await.unwrap();
        tx.send(ChannelEvent::Other("connected")).await.unwrap();
        tx.send(ChannelEvent::Other("after")).await.unwrap();

        await_connection(&mut rx, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(rx.recv().await, Some(ChannelEvent::Other("after")));
    }

    #[tokio::test]
    async fn test_connection_fails_on_logout_or_failure() {
        for kind in ["disconnected", "logged_out", "connect_failure"] {
            let (tx, mut rx) = mpsc::channel(8);
            tx.send(ChannelEvent::Other(kind)).await.unwrap();
            tx.send(ChannelEvent::Other("connected")).await.unwrap();

            let err = await_connection(&mut rx, Duration::from_secs(5))
                .await
                .unwrap_err();
            assert!(matches!(err, RelayError::Bootstrap(_)), "{kind}");
        }
    }

    #[tokio::test]
    async fn test_connection_fails_when_stream_closes() {
        let (tx, mut rx) = mpsc::channel::<ChannelEvent>(8);
        drop(tx);

        let err = await_connection(&mut rx, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Bootstrap(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_connection_times_out_while_client_retries() {
        // Sender kept alive: the client is still retrying, nothing arrives.
        let (_tx, mut rx) = mpsc::channel::<ChannelEvent>(8);

        let err = await_connection(&mut rx, CONNECT_TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Bootstrap(ref m) if m.contains("60s")));
    }

    #[tokio::test]
    async fn test_pairing_fails_when_stream_closes() {
        let (tx, mut rx) = mpsc::channel(8);
        tx.send(ChannelEvent::PairingCode("2@only".into()))
            .await
            .unwrap();
        drop(tx);

        let err = await_pairing(&mut rx, |_| {}).await.unwrap_err();
        assert!(matches!(err, RelayError::Bootstrap(_)));
    }
}
