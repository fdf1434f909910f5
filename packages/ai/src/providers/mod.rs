//! LLM provider abstraction and implementations.
//!
//! Supports Anthropic Claude and `OpenAI`-compatible chat completions via a
//! common trait.

pub mod anthropic;
pub mod openai;

use std::time::Duration;

use crate::AiError;

/// Default timeout for a single completion request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Maximum number of tokens requested for one report.
pub const MAX_TOKENS: u32 = 2048;

/// Trait for LLM providers that turn a prompt into prose.
#[async_trait::async_trait]
pub trait Narrator: Send + Sync {
    /// Sends `prompt` as a single user message and returns the text reply.
    ///
    /// # Errors
    ///
    /// Returns [`AiError`] if the request fails.
    async fn narrate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Creates a narrator based on environment variables.
///
/// If `AI_PROVIDER` is explicitly set, uses that provider. Otherwise
/// auto-detects from available credentials:
///
/// 1. `ANTHROPIC_API_KEY` set -> Anthropic Claude
/// 2. `OPENAI_API_KEY` set -> `OpenAI`
///
/// `AI_MODEL` overrides the model and `AI_BASE_URL` the API root. An
/// `OpenAI`-compatible server reached through `AI_BASE_URL` does not need
/// an API key.
///
/// # Errors
///
/// Returns [`AiError::Config`] if no credentials are found or the
/// explicitly requested provider is not configured.
pub fn create_narrator_from_env(client: reqwest::Client) -> Result<Box<dyn Narrator>, AiError> {
    let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| detect_provider());
    let base_url = std::env::var("AI_BASE_URL").ok();

    match provider.to_lowercase().as_str() {
        "anthropic" | "claude" => {
            let api_key = std::env::var("ANTHROPIC_API_KEY").map_err(|_| AiError::Config {
                message: "ANTHROPIC_API_KEY environment variable not set".to_string(),
            })?;
            let model = std::env::var("AI_MODEL")
                .unwrap_or_else(|_| anthropic::DEFAULT_MODEL.to_string());

            let mut narrator = anthropic::AnthropicProvider::new(client, api_key, model);
            if let Some(base_url) = base_url {
                narrator = narrator.with_base_url(base_url);
            }
            Ok(Box::new(narrator))
        }
        "openai" | "gpt" => {
            let api_key = match (std::env::var("OPENAI_API_KEY"), &base_url) {
                (Ok(key), _) => Some(key),
                (Err(_), Some(_)) => None,
                (Err(_), None) => {
                    return Err(AiError::Config {
                        message: "OPENAI_API_KEY environment variable not set".to_string(),
                    });
                }
            };
            let model =
                std::env::var("AI_MODEL").unwrap_or_else(|_| openai::DEFAULT_MODEL.to_string());

            let mut narrator = openai::OpenAiProvider::new(client, api_key, model);
            if let Some(base_url) = base_url {
                narrator = narrator.with_base_url(base_url);
            }
            Ok(Box::new(narrator))
        }
        other => Err(AiError::Config {
            message: format!("Unknown AI provider: {other}. Use 'anthropic' or 'openai'."),
        }),
    }
}

/// Auto-detects which provider to use based on available credentials.
///
/// Returns a provider name string that matches the arms in
/// [`create_narrator_from_env`].
fn detect_provider() -> String {
    if std::env::var("ANTHROPIC_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: Anthropic (ANTHROPIC_API_KEY found)");
        return "anthropic".to_string();
    }

    if std::env::var("OPENAI_API_KEY").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI (OPENAI_API_KEY found)");
        return "openai".to_string();
    }

    if std::env::var("AI_BASE_URL").is_ok() {
        log::info!("Auto-detected AI provider: OpenAI-compatible server (AI_BASE_URL found)");
        return "openai".to_string();
    }

    log::warn!(
        "No AI credentials detected. Set one of: ANTHROPIC_API_KEY, OPENAI_API_KEY, \
         or AI_BASE_URL. You can also set AI_PROVIDER explicitly."
    );

    // Will produce a clear error about the missing key
    "anthropic".to_string()
}
