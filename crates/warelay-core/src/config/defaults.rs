//! Default value functions used by serde for config deserialization.

pub fn default_data_dir() -> String {
    "~/.warelay".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_completion_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

pub fn default_completion_model() -> String {
    "mixtral-8x7b-32768".to_string()
}

pub fn default_device_name() -> String {
    "warelay".to_string()
}
