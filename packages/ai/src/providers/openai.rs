//! `OpenAI` chat completions provider implementation.
//!
//! Also serves `OpenAI`-compatible servers such as Ollama or vLLM.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{DEFAULT_TIMEOUT, MAX_TOKENS, Narrator};
use crate::AiError;

/// Model used when `AI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Public `OpenAI` API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// `OpenAI` API provider.
pub struct OpenAiProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// Creates a new `OpenAI` provider.
    ///
    /// `api_key` may be `None` for local servers that do not authenticate.
    #[must_use]
    pub fn new(client: reqwest::Client, api_key: Option<String>, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client,
        }
    }

    /// Overrides the API root (up to and including `/v1`).
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

#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: [OpenAiMessage<'a>; 1],
    max_tokens: u32,
}

#[derive(Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAiError {
    error: OpenAiErrorDetail,
}

#[derive(Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[async_trait::async_trait]
impl Narrator for OpenAiProvider {
    async fn narrate(&self, prompt: &str) -> Result<String, AiError> {
        let request = OpenAiRequest {
            model: &self.model,
            messages: [OpenAiMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        log::debug!("Requesting report from OpenAI-compatible model {}", self.model);

        let mut builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request);
        if let Some(api_key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {api_key}"));
        }

        let resp = builder.send().await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let err: OpenAiError = serde_json::from_str(&body).unwrap_or_else(|_| OpenAiError {
                error: OpenAiErrorDetail {
                    message: format!("HTTP {status}: {body}"),
                },
            });
            return Err(AiError::Provider {
                message: err.error.message,
            });
        }

        let response: OpenAiResponse = serde_json::from_str(&body)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AiError::Provider {
                message: "No choices in OpenAI response".to_string(),
            })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn returns_first_choice() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "gpt-4o",
                "messages": [{ "role": "user", "content": "Write it" }],
            })))
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"Report"},"finish_reason":"stop"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(
            reqwest::Client::new(),
            Some("sk-test".to_string()),
            DEFAULT_MODEL.to_string(),
        )
        .with_base_url(server.url());

        assert_eq!(provider.narrate("Write it").await.unwrap(), "Report");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn local_server_without_key() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":null}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let provider =
            OpenAiProvider::new(reqwest::Client::new(), None, "llama3".to_string())
                .with_base_url(format!("{}/v1/", server.url()));

        assert_eq!(provider.narrate("Write it").await.unwrap(), "");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_choices_is_provider_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let provider = OpenAiProvider::new(
            reqwest::Client::new(),
            Some("sk-test".to_string()),
            DEFAULT_MODEL.to_string(),
        )
        .with_base_url(server.url());

        assert!(matches!(
            provider.narrate("Write it").await,
            Err(AiError::Provider { .. })
        ));
    }
}
