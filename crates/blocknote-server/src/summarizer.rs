//! Backends for `POST /api/summarize`.

use async_trait::async_trait;

use blocknote_dispatch::SummarizeKind;

use crate::BackendError;
use crate::gemini::GeminiClient;

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize `content`. `kind` is `None` when the request named an
    /// unrecognised type.
    async fn summarize(
        &self,
        content: &str,
        kind: Option<SummarizeKind>,
    ) -> Result<String, BackendError>;
}

/// Model instruction for a summary request.
pub fn instruction(content: &str, kind: Option<SummarizeKind>) -> String {
    match kind {
        Some(kind) => kind.instruction(content),
        None => format!("Please summarize the following content:\n\n{content}"),
    }
}

/// Summaries from Gemini.
#[derive(Debug, Clone)]
pub struct GeminiSummarizer {
    client: GeminiClient,
}

impl GeminiSummarizer {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(
        &self,
        content: &str,
        kind: Option<SummarizeKind>,
    ) -> Result<String, BackendError> {
        self.client.complete(instruction(content, kind)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_kinds_use_their_template() {
        assert_eq!(
            instruction("abc", Some(SummarizeKind::Explain)),
            "Please explain the following content in simple terms:\n\nabc"
        );
        assert!(instruction("abc", Some(SummarizeKind::Summarize)).contains("concise summary"));
    }

    #[test]
    fn test_unknown_kind_uses_generic_template() {
        assert_eq!(
            instruction("abc", None),
            "Please summarize the following content:\n\nabc"
        );
    }
}
