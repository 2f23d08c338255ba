//! Groq chat-completion provider (OpenAI-compatible wire format).
//!
//! One request per prompt: a single user-role message, no history, no
//! retries, no streaming. The HTTP status is not inspected; whatever body
//! comes back is decoded as a completion response.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use warelay_core::{config::CompletionConfig, error::RelayError, traits::Provider};

/// Groq (or any OpenAI-compatible) completion client.
pub struct GroqProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqProvider {
    /// Create from config values. An empty key is accepted here and
    /// rejected on the first `complete` call.
    pub fn from_config(config: &CompletionConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.trim().to_string(),
            model: config.model.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
}

#[derive(Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

/// Request body for a single-turn prompt.
pub(crate) fn build_request(prompt: &str, model: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        messages: vec![ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
        model: model.to_string(),
    }
}

/// Decode a response body and take the first choice's content.
pub(crate) fn parse_completion(body: &[u8]) -> Result<String, RelayError> {
    let parsed: ChatCompletionResponse = serde_json::from_slice(body)
        .map_err(|e| RelayError::Decoding(format!("error unmarshaling response JSON: {e}")))?;

    parsed
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or(RelayError::EmptyResponse)
}

#[async_trait]
impl Provider for GroqProvider {
    fn name(&self) -> &str {
        "groq"
    }

    async fn complete(&self, prompt: &str) -> Result<String, RelayError> {
        if self.api_key.is_empty() {
            return Err(RelayError::Configuration(format!(
                "{} environment variable not set",
                warelay_core::config::API_KEY_ENV
            )));
        }

        let body = serde_json::to_vec(&build_request(prompt, &self.model))?;

        let url = self.endpoint();
        debug!("groq: POST {url} model={}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| RelayError::Transport(format!("error sending request: {e}")))?;

        debug!("groq: response status {}", resp.status());

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| RelayError::Transport(format!("error reading response body: {e}")))?;

        parse_completion(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(base_url: &str, api_key: &str) -> GroqProvider {
        GroqProvider::from_config(&CompletionConfig {
            base_url: base_url.to_string(),
            model: "mixtral-8x7b-32768".to_string(),
            api_key: api_key.to_string(),
        })
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider("https://api.groq.com/openai/v1", "gsk").name(), "groq");
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let p = provider("https://api.groq.com/openai/v1/", "gsk");
        assert_eq!(p.endpoint(), "https://api.groq.com/openai/v1/chat/completions");
    }

    #[test]
    fn test_request_shape() {
        let req = build_request("what is 2+2", "mixtral-8x7b-32768");
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "messages": [{"role": "user", "content": "what is 2+2"}],
                "model": "mixtral-8x7b-32768"
            })
        );
    }

    #[test]
    fn test_parse_first_choice() {
        let body = br#"{"choices":[{"message":{"content":"4"}},{"message":{"content":"four"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "4");
    }

    #[test]
    fn test_parse_with_extra_fields() {
        let body = br#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"},"finish_reason":"stop"}],"usage":{"total_tokens":42}}"#;
        assert_eq!(parse_completion(body).unwrap(), "Hello!");
    }

    #[test]
    fn test_parse_empty_choices() {
        let err = parse_completion(br#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, RelayError::EmptyResponse));
    }

    #[test]
    fn test_parse_error_object_is_empty_response() {
        let body = br#"{"error":{"message":"Invalid API Key","type":"invalid_request_error"}}"#;
        assert!(matches!(
            parse_completion(body).unwrap_err(),
            RelayError::EmptyResponse
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_completion(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, RelayError::Decoding(_)));
    }

    // ── HTTP tests (with mockito) ──────────────────────────────────────

    #[tokio::test]
    async fn test_missing_key_fails_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let err = provider(&server.url(), "").complete("hi").await.unwrap_err();
        assert!(matches!(err, RelayError::Configuration(_)));
        assert!(err.to_string().contains("GROQ_API_KEY"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer gsk-test")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "messages": [{"role": "user", "content": "what is 2+2"}],
                "model": "mixtral-8x7b-32768"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"content":"4"}}]}"#)
            .create_async()
            .await;

        let text = provider(&server.url(), "gsk-test")
            .complete("what is 2+2")
            .await
            .unwrap();
        assert_eq!(text, "4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = provider(&server.url(), "gsk-test")
            .complete("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_non_success_status_is_decoded_not_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let err = provider(&server.url(), "gsk-test")
            .complete("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Decoding(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let err = provider("http://127.0.0.1:9", "gsk-test")
            .complete("hi")
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Transport(_)));
    }
}
