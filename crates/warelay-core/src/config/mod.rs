mod channels;
mod defaults;
mod providers;


pub use channels::*;
pub use providers::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::RelayError;
use defaults::*;

/// Top-level warelay configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

/// General relay settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, RelayError> {
    toml::from_str(content)
        .map_err(|e| RelayError::Configuration(format!("failed to parse config: {e}")))
}

/// Load configuration from a TOML file and resolve the completion API key.
///
/// Falls back to defaults if the file does not exist. An empty
/// `completion.api_key` is filled from `GROQ_API_KEY`; a key that is still
/// missing is not an error here, it surfaces on the first completion call.
pub fn load(path: &str) -> Result<Config, RelayError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RelayError::Configuration(format!("failed to read {}: {e}", path.display()))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.completion = config
        .completion
        .with_env_fallback(std::env::var(API_KEY_ENV).ok());

    Ok(config)
}
