use serde::{Deserialize, Serialize};

use super::defaults::default_device_name;

/// WhatsApp channel config.
///
/// Session data is stored at `{data_dir}/whatsapp_session/whatsapp.db`.
/// Pairing is done by scanning a QR code (like WhatsApp Web).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    /// Name shown in the phone's "Linked devices" list.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            device_name: default_device_name(),
        }
    }
}
