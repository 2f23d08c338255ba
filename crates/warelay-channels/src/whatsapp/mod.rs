//! WhatsApp channel over `whatsapp-rust`.
//!
//! Uses the WhatsApp Web protocol (Noise handshake + Signal encryption).
//! Pairing is done by scanning a QR code, like WhatsApp Web.
//! Session is persisted by the client library's SQLite store at
//! `{data_dir}/whatsapp_session/whatsapp.db`.

mod bot;
mod channel;
mod events;
mod qr;
mod sent;


pub use qr::render_qr_terminal;

use sent::SentIds;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::info;
use wacore::store::traits::DeviceStore;
use warelay_core::{config::WhatsAppConfig, error::RelayError};
use whatsapp_rust::client::Client;
use whatsapp_rust::store::SqliteStore;

/// WhatsApp channel using the WhatsApp Web protocol.
pub struct WhatsAppChannel {
    pub(super) config: WhatsAppConfig,
    pub(super) store: Arc<SqliteStore>,
    /// Client handle for sending. Set once the bot is built, cleared on
    /// disconnect.
    pub(super) client: Arc<Mutex<Option<Arc<Client>>>>,
    /// Recently sent reply IDs, so their echo is not handled as a new message.
    pub(super) sent_ids: Arc<Mutex<SentIds>>,
    /// Background task driving the bot.
    pub(super) bot_task: Mutex<Option<JoinHandle<()>>>,
}

impl WhatsAppChannel {
    /// Open the session store under `data_dir`, creating it if needed.
    pub async fn open(config: WhatsAppConfig, data_dir: &str) -> Result<Self, RelayError> {
        let db_path = session_db_path(data_dir);
        if let Some(dir) = db_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                RelayError::Bootstrap(format!("cannot create {}: {e}", dir.display()))
            })?;
        }

        info!("WhatsApp session store: {}", db_path.display());
        let store = SqliteStore::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| RelayError::Bootstrap(format!("whatsapp store init failed: {e}")))?;

        Ok(Self {
            config,
            store: Arc::new(store),
            client: Arc::new(Mutex::new(None)),
            sent_ids: Arc::new(Mutex::new(SentIds::default())),
            bot_task: Mutex::new(None),
        })
    }

    /// Whether a paired device identity is already stored.
    pub async fn has_identity(&self) -> Result<bool, RelayError> {
        stored_identity(self.store.as_ref()).await
    }
}

/// A device row alone is not an identity: the client saves an unpaired
/// device on its first connect. Paired devices carry a phone-number JID.
pub(super) async fn stored_identity<S>(store: &S) -> Result<bool, RelayError>
where
    S: DeviceStore + ?Sized,
{
    let device = store
        .load()
        .await
        .map_err(|e| RelayError::Bootstrap(format!("whatsapp identity query failed: {e}")))?;
    Ok(device.is_some_and(|d| d.pn.is_some()))
}

/// Session database location for a data directory.
pub fn session_db_path(data_dir: &str) -> PathBuf {
    PathBuf::from(warelay_core::config::shellexpand(data_dir))
        .join("whatsapp_session")
        .join("whatsapp.db")
}
