//! JSON request/response shapes for the generation and summarization
//! endpoints. Shared by the clients here and the server handlers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::EnumString;

use blocknote_types::BlockDescriptor;

/// `POST /api/generate` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// `POST /api/generate` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub blocks: Vec<BlockDescriptor>,
    /// Informational note from the endpoint (e.g. "stub response").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// What the summarizer should produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum SummarizeKind {
    /// Concise summary.
    #[default]
    Summarize,
    /// Plain-language explanation.
    Explain,
    /// Structured outline.
    Outline,
}

impl SummarizeKind {
    /// Parse from string (case-insensitive).
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        <Self as FromStr>::from_str(s).ok()
    }

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SummarizeKind::Summarize => "summarize",
            SummarizeKind::Explain => "explain",
            SummarizeKind::Outline => "outline",
        }
    }

    /// Model instruction wrapping `content` for this kind.
    pub fn instruction(&self, content: &str) -> String {
        match self {
            SummarizeKind::Summarize => {
                format!("Please provide a concise summary of the following content:\n\n{content}")
            }
            SummarizeKind::Explain => {
                format!("Please explain the following content in simple terms:\n\n{content}")
            }
            SummarizeKind::Outline => {
                format!("Please create an outline of the following content:\n\n{content}")
            }
        }
    }
}

impl std::fmt::Display for SummarizeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `POST /api/summarize` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: SummarizeKind,
}

/// `POST /api/summarize` success body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Body of every non-success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknote_types::BlockKind;

    #[test]
    fn test_generate_response_parses_sample() {
        let json = r#"{
            "blocks": [
                {"type": "heading", "content": "Title"},
                {"type": "text", "content": "Body"}
            ],
            "message": "stub"
        }"#;
        let resp: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.blocks.len(), 2);
        assert_eq!(resp.blocks[0].kind, BlockKind::Heading);
        assert_eq!(resp.message.as_deref(), Some("stub"));
    }

    #[test]
    fn test_summarize_kind_defaults_and_parses() {
        let req: SummarizeRequest = serde_json::from_str(r#"{"content":"x"}"#).unwrap();
        assert_eq!(req.kind, SummarizeKind::Summarize);
        let req: SummarizeRequest =
            serde_json::from_str(r#"{"content":"x","type":"outline"}"#).unwrap();
        assert_eq!(req.kind, SummarizeKind::Outline);
        assert_eq!(SummarizeKind::from_str("EXPLAIN"), Some(SummarizeKind::Explain));
        assert_eq!(SummarizeKind::from_str("haiku"), None);
    }

    #[test]
    fn test_instruction_embeds_content() {
        let text = SummarizeKind::Outline.instruction("the notes");
        assert!(text.starts_with("Please create an outline"));
        assert!(text.ends_with("the notes"));
    }

    #[test]
    fn test_error_body_skips_empty_details() {
        let json = serde_json::to_value(ErrorBody::new("bad")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "bad"}));
    }
}
