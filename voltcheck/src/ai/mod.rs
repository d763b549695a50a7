//! AI Gateway Module
//!
//! Stateless wrappers around the hosted generative model: regulatory Q&A
//! with web grounding, panel image audits, instrument-display OCR and the
//! guided troubleshooting chat. One attempt per user action; failures are
//! structured here and collapse to a fixed message at the UI boundary.

pub mod gemini;
pub mod prompts;
pub mod provider;
pub mod session;

pub use gemini::GeminiClient;
pub use provider::{AiAssistant, AiConfig, Answer, PanelAudit};
pub use session::Troubleshooter;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error("Missing API key")]
    MissingApiKey,
    #[error("Empty response from model")]
    EmptyResponse,
}

impl AiError {
    /// The one string the UI shows for any gateway failure.
    pub fn user_message(&self) -> &'static str {
        "The assistant could not respond. Check the connection and API key, then try again."
    }
}
