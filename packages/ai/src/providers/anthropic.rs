//! Anthropic Claude provider implementation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_TIMEOUT, MAX_TOKENS, Narrator};
use crate::AiError;

/// Model used when `AI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Public Anthropic API root.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

/// Anthropic Claude API provider.
pub struct AnthropicProvider {
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client,
        }
    }

    /// Overrides the API root (without the `/v1/messages` path).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Anthropic API request body.
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [AnthropicMessage<'a>; 1],
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Anthropic API response body.
#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

/// Anthropic API error response.
#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl Narrator for AnthropicProvider {
    async fn narrate(&self, prompt: &str) -> Result<String, AiError> {
        let request = AnthropicRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: [AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        log::debug!("Requesting report from Anthropic model {}", self.model);

        let resp = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: AnthropicError =
                serde_json::from_str(&body).unwrap_or_else(|_| AnthropicError {
                    error: AnthropicErrorDetail {
                        message: format!("HTTP {status}: {body}"),
                    },
                });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        let response: AnthropicResponse = serde_json::from_str(&body)?;

        Ok(response
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicContentBlock::Text { text } => Some(text),
                AnthropicContentBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn provider(base_url: &str) -> AnthropicProvider {
        AnthropicProvider::new(
            reqwest::Client::new(),
            "test-key".to_string(),
            DEFAULT_MODEL.to_string(),
        )
        .with_base_url(base_url)
    }

    #[tokio::test]
    async fn joins_text_blocks() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": DEFAULT_MODEL,
                "messages": [{ "role": "user", "content": "Write it" }],
            })))
            .with_status(200)
            .with_body(
                r##"{
                    "content": [
                        { "type": "text", "text": "# Headline\n" },
                        { "type": "thinking", "thinking": "..." },
                        { "type": "text", "text": "Body" }
                    ],
                    "stop_reason": "end_turn"
                }"##,
            )
            .expect(1)
            .create_async()
            .await;

        let text = provider(&server.url()).narrate("Write it").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "# Headline\nBody");
    }

    #[tokio::test]
    async fn api_error_message_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(529)
            .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
            .create_async()
            .await;

        let err = provider(&server.url()).narrate("Write it").await.unwrap_err();
        match err {
            AiError::Provider { message } => assert_eq!(message, "Overloaded"),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
