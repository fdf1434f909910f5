#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Narrative monthly crime reports written by an LLM.
//!
//! Supports Anthropic Claude, `OpenAI`, and any `OpenAI`-compatible
//! local/self-hosted server (Ollama, vLLM, llama.cpp, LM Studio) via the
//! `AI_BASE_URL` environment variable. Report generation never fails: a
//! provider error is replaced by a short placeholder text.

pub mod prompt;
pub mod providers;

use crime_watch_analytics_models::CrimeSummary;
use crime_watch_crime_models::{IncidentRecord, ReportingPeriod};
use thiserror::Error;

pub use providers::{Narrator, create_narrator_from_env};

/// Report text used when the provider returns no text, or none is
/// configured.
pub const REPORT_UNAVAILABLE: &str = "Report generation unavailable.";

/// Report text used when the provider call fails.
pub const REPORT_CONNECTION_ERROR: &str =
    "Unable to generate AI report at this time due to a connection error.";

/// Errors that can occur during AI operations.
#[derive(Debug, Error)]
pub enum AiError {
    /// HTTP request to LLM provider failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Provider-specific error.
    #[error("Provider error: {message}")]
    Provider {
        /// Description of what went wrong.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Description.
        message: String,
    },
}

/// Writes the monthly report for `area` and `period`.
///
/// Returns [`REPORT_UNAVAILABLE`] if the model answers with empty text and
/// [`REPORT_CONNECTION_ERROR`] if the call fails.
pub async fn generate_report(
    narrator: &dyn Narrator,
    area: &str,
    period: ReportingPeriod,
    summary: &CrimeSummary,
    records: &[IncidentRecord],
) -> String {
    let prompt = prompt::build_report_prompt(area, period, summary, records);

    match narrator.narrate(&prompt).await {
        Ok(text) if text.trim().is_empty() => {
            log::warn!("Narrator returned an empty report");
            REPORT_UNAVAILABLE.to_string()
        }
        Ok(text) => text,
        Err(e) => {
            log::error!("Report generation failed: {e}");
            REPORT_CONNECTION_ERROR.to_string()
        }
    }
}
