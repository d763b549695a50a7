//! AI Assistant Trait
//!
//! Common interface for the hosted assistant so the gateway can be
//! substituted in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ai::AiError;
use crate::project::model::{ChatMessage, Citation};

/// Gateway configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    pub const DEFAULT_MODEL: &'static str = "gemini-3-flash-preview";

    /// `GEMINI_API_KEY` is required; `VOLTCHECK_AI_MODEL` overrides the
    /// default model.
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| AiError::MissingApiKey)?;
        if api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }
        let model = std::env::var("VOLTCHECK_AI_MODEL")
            .unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());
        Ok(AiConfig { api_key, model })
    }
}

/// A grounded answer to a free-text question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub citations: Vec<Citation>,
}

/// Result of a panel image audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelAudit {
    /// Narrative findings: risks, components, compliance remarks.
    pub narrative: String,
    /// Single-line schematic block, when one was requested and returned.
    pub diagram: Option<String>,
}

/// The hosted assistant surface used across the app.
#[async_trait]
pub trait AiAssistant: Send + Sync {
    /// Free-text regulatory question with web-search grounding.
    async fn ask(&self, question: &str) -> Result<Answer, AiError>;

    /// Audit a panel photo (base64 JPEG).
    async fn audit_panel(
        &self,
        image_base64: &str,
        include_diagram: bool,
    ) -> Result<PanelAudit, AiError>;

    /// Best-effort numeric readout of an instrument display photo.
    /// Returns an empty string when no number could be extracted.
    async fn read_instrument(&self, image_base64: &str) -> Result<String, AiError>;

    /// One troubleshooting turn: the transcript so far plus the new
    /// message, full history resent every call.
    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, AiError>;

    /// Compose an intervention report from a finished transcript.
    async fn compose_report(&self, history: &[ChatMessage]) -> Result<String, AiError>;
}
