use thiserror::Error;

/// Top-level error type for warelay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Missing API key, or an unreadable/invalid config file.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Request payload could not be serialized.
    #[error("encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The HTTP call or the body read did not complete.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not the expected JSON shape.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// The completion API returned no choices.
    #[error("no choices found in the response")]
    EmptyResponse,

    /// Session store or connection failure at startup.
    #[error("bootstrap error: {0}")]
    Bootstrap(String),

    /// Error from the messaging channel at runtime.
    #[error("channel error: {0}")]
    Channel(String),
}
