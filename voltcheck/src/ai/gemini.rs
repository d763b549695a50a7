//! Gemini Client
//!
//! Thin wrapper over the hosted `generateContent` REST endpoint. One
//! request per user action: no retries, no backoff, no response caching.

use std::sync::OnceLock;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ai::prompts::{self, DIAGRAM_SENTINEL};
use crate::ai::provider::{AiAssistant, AiConfig, Answer, PanelAudit};
use crate::ai::AiError;
use crate::project::model::{ChatMessage, ChatRole, Citation};
use async_trait::async_trait;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const IMAGE_MIME_TYPE: &str = "image/jpeg";

// Sampling temperatures per surface, matching how each is consumed:
// exploratory Q&A, cautious audits, near-deterministic OCR.
const QA_TEMPERATURE: f64 = 0.7;
const AUDIT_TEMPERATURE: f64 = 0.4;
const CHAT_TEMPERATURE: f64 = 0.3;
const REPORT_TEMPERATURE: f64 = 0.3;
const OCR_TEMPERATURE: f64 = 0.1;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: serde_json::Value,
}

impl Tool {
    fn web_search() -> Self {
        Tool {
            google_search: serde_json::json!({}),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Content {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
                inline_data: None,
            }],
        }
    }

    fn image_with_text(image_base64: &str, text: impl Into<String>) -> Self {
        Content {
            role: Some("user".to_string()),
            parts: vec![
                Part {
                    text: None,
                    inline_data: Some(InlineData {
                        mime_type: IMAGE_MIME_TYPE.to_string(),
                        data: image_base64.to_string(),
                    }),
                },
                Part {
                    text: Some(text.into()),
                    inline_data: None,
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(rename = "groundingMetadata", default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GroundingMetadata {
    #[serde(rename = "groundingChunks", default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    title: String,
}

/// Concatenated text of the first candidate.
pub(crate) fn extract_text(response: &GenerateResponse) -> Result<String, AiError> {
    let candidate = response.candidates.first().ok_or(AiError::EmptyResponse)?;
    let content = candidate.content.as_ref().ok_or(AiError::EmptyResponse)?;
    let text: String = content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() {
        return Err(AiError::EmptyResponse);
    }
    Ok(text)
}

/// Web sources the first candidate was grounded on.
pub(crate) fn extract_citations(response: &GenerateResponse) -> Vec<Citation> {
    let Some(candidate) = response.candidates.first() else {
        return Vec::new();
    };
    let Some(meta) = candidate.grounding_metadata.as_ref() else {
        return Vec::new();
    };
    meta.grounding_chunks
        .iter()
        .filter_map(|c| c.web.as_ref())
        .map(|w| Citation {
            title: w.title.clone(),
            uri: w.uri.clone(),
        })
        .collect()
}

/// Split an audit response at the diagram sentinel.
pub(crate) fn split_panel_report(text: &str) -> PanelAudit {
    match text.split_once(DIAGRAM_SENTINEL) {
        Some((narrative, diagram)) => PanelAudit {
            narrative: narrative.trim_end().to_string(),
            diagram: Some(diagram.trim().to_string()),
        },
        None => PanelAudit {
            narrative: text.to_string(),
            diagram: None,
        },
    }
}

/// First decimal number in the model's OCR output, comma normalized to
/// dot; empty when the output contains no number at all.
pub(crate) fn extract_reading(text: &str) -> String {
    static READING: OnceLock<Regex> = OnceLock::new();
    let re = READING.get_or_init(|| {
        Regex::new(r"[0-9]+([,.][0-9]+)?").expect("reading pattern is valid")
    });
    re.find(text)
        .map(|m| m.as_str().replace(',', "."))
        .unwrap_or_default()
}

fn history_contents(history: &[ChatMessage], message: &str) -> Vec<Content> {
    let mut contents: Vec<Content> = history
        .iter()
        .map(|m| {
            let role = match m.role {
                ChatRole::User => "user",
                ChatRole::Assistant => "model",
            };
            Content::text(Some(role), m.content.clone())
        })
        .collect();
    contents.push(Content::text(Some("user"), message));
    contents
}

/// Client for the hosted Gemini API.
pub struct GeminiClient {
    client: Client,
    config: AiConfig,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> Self {
        GeminiClient {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, AiError> {
        Ok(Self::new(AiConfig::from_env()?))
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, AiError> {
        if self.config.api_key.is_empty() {
            return Err(AiError::MissingApiKey);
        }
        let url = format!(
            "{API_BASE_URL}/{}:generateContent?key={}",
            self.config.model, self.config.api_key
        );
        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "model request rejected");
            return Err(AiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl AiAssistant for GeminiClient {
    async fn ask(&self, question: &str) -> Result<Answer, AiError> {
        let request = GenerateRequest {
            contents: vec![Content::text(None, question)],
            system_instruction: Some(Content::text(None, prompts::SYSTEM_PROMPT)),
            generation_config: GenerationConfig {
                temperature: QA_TEMPERATURE,
            },
            tools: vec![Tool::web_search()],
        };
        let response = self.generate(&request).await?;
        Ok(Answer {
            text: extract_text(&response)?,
            citations: extract_citations(&response),
        })
    }

    async fn audit_panel(
        &self,
        image_base64: &str,
        include_diagram: bool,
    ) -> Result<PanelAudit, AiError> {
        let request = GenerateRequest {
            contents: vec![Content::image_with_text(
                image_base64,
                prompts::panel_audit_prompt(include_diagram),
            )],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: AUDIT_TEMPERATURE,
            },
            tools: Vec::new(),
        };
        let response = self.generate(&request).await?;
        Ok(split_panel_report(&extract_text(&response)?))
    }

    async fn read_instrument(&self, image_base64: &str) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![Content::image_with_text(image_base64, prompts::OCR_PROMPT)],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: OCR_TEMPERATURE,
            },
            tools: Vec::new(),
        };
        let response = self.generate(&request).await?;
        // A display with no readable digits is an empty string, not an error.
        Ok(extract_reading(&extract_text(&response)?))
    }

    async fn chat(&self, history: &[ChatMessage], message: &str) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: history_contents(history, message),
            system_instruction: Some(Content::text(None, prompts::TROUBLESHOOTING_SYSTEM_PROMPT)),
            generation_config: GenerationConfig {
                temperature: CHAT_TEMPERATURE,
            },
            tools: Vec::new(),
        };
        let response = self.generate(&request).await?;
        extract_text(&response)
    }

    async fn compose_report(&self, history: &[ChatMessage]) -> Result<String, AiError> {
        let request = GenerateRequest {
            contents: vec![Content::text(None, prompts::report_prompt(history))],
            system_instruction: None,
            generation_config: GenerationConfig {
                temperature: REPORT_TEMPERATURE,
            },
            tools: Vec::new(),
        };
        let response = self.generate(&request).await?;
        extract_text(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_json(raw: &str) -> GenerateResponse {
        serde_json::from_str(raw).expect("fixture parses")
    }

    #[test]
    fn text_and_citations_come_from_first_candidate() {
        let response = response_json(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Use a 40 mm"}, {"text": " tube."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"web": {"uri": "https://boe.es/itc-bt-21", "title": "ITC-BT-21"}},
                        {"retrievedContext": {}}
                    ]}
                }]
            }"#,
        );
        assert_eq!(extract_text(&response).unwrap(), "Use a 40 mm tube.");
        let citations = extract_citations(&response);
        assert_eq!(citations.len(), 1);
        assert_eq!(citations[0].title, "ITC-BT-21");
    }

    #[test]
    fn empty_candidates_are_an_error() {
        let response = response_json(r#"{"candidates": []}"#);
        assert!(matches!(
            extract_text(&response),
            Err(AiError::EmptyResponse)
        ));
        assert!(extract_citations(&response).is_empty());
    }

    #[test]
    fn panel_report_splits_at_sentinel() {
        let audit = split_panel_report("Narrative text.\n[DIAGRAM]\nL1--RCD--MCB1");
        assert_eq!(audit.narrative, "Narrative text.");
        assert_eq!(audit.diagram.as_deref(), Some("L1--RCD--MCB1"));

        let plain = split_panel_report("Narrative only.");
        assert_eq!(plain.diagram, None);
        assert_eq!(plain.narrative, "Narrative only.");
    }

    #[test]
    fn reading_extraction_normalizes_commas() {
        assert_eq!(extract_reading("The display shows 12,47 ohm"), "12.47");
        assert_eq!(extract_reading("0.35"), "0.35");
        assert_eq!(extract_reading("value: 230"), "230");
        assert_eq!(extract_reading("no digits here"), "");
    }

    #[test]
    fn chat_history_maps_roles_to_wire_names() {
        let history = vec![
            ChatMessage::user("no power"),
            ChatMessage::assistant("check the main breaker"),
        ];
        let contents = history_contents(&history, "it is on");
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0].role.as_deref(), Some("user"));
        assert_eq!(contents[1].role.as_deref(), Some("model"));
        assert_eq!(contents[2].role.as_deref(), Some("user"));
    }

    #[test]
    fn request_serializes_expected_shape() {
        let request = GenerateRequest {
            contents: vec![Content::image_with_text("QUJD", "describe")],
            system_instruction: None,
            generation_config: GenerationConfig { temperature: 0.4 },
            tools: vec![Tool::web_search()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "describe");
        assert!(json["tools"][0]["googleSearch"].is_object());
        assert!(json.get("systemInstruction").is_none());
    }
}
