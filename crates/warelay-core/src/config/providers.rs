use serde::{Deserialize, Serialize};

use super::defaults::{default_completion_base_url, default_completion_model};

/// Environment variable consulted when `completion.api_key` is empty.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Chat-completion endpoint config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_completion_model")]
    pub model: String,
    /// Bearer token. Empty means "take it from `GROQ_API_KEY`".
    #[serde(default)]
    pub api_key: String,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            base_url: default_completion_base_url(),
            model: default_completion_model(),
            api_key: String::new(),
        }
    }
}

impl CompletionConfig {
    /// Fill an empty `api_key` from the given environment value.
    ///
    /// A key set in the config file always wins.
    pub fn with_env_fallback(mut self, env_key: Option<String>) -> Self {
        if self.api_key.trim().is_empty() {
            self.api_key = env_key.map(|k| k.trim().to_string()).unwrap_or_default();
        }
        self
    }

    /// Whether a non-empty key is configured.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
