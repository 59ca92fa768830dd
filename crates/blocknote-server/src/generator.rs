//! Backends for `POST /api/generate`.

use async_trait::async_trait;
use tracing::debug;

use blocknote_dispatch::GenerateResponse;
use blocknote_types::{BlockDescriptor, BlockDraft, BlockKind, BlockMetadata};

use crate::BackendError;
use crate::gemini::GeminiClient;

/// Turns a prompt into a batch of block descriptors.
#[async_trait]
pub trait BlockGenerator: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, BackendError>;
}

/// Fixed three-block answer used when no API key is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubGenerator;

impl StubGenerator {
    pub const MESSAGE: &'static str =
        "This is a stub response. Set GEMINI_API_KEY to enable real AI generation.";
}

#[async_trait]
impl BlockGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, BackendError> {
        let blocks = vec![
            BlockDescriptor::new(BlockKind::Heading, "AI-Generated Response").with_metadata(
                BlockMetadata {
                    level: Some(2),
                    ..Default::default()
                },
            ),
            BlockDescriptor::new(
                BlockKind::Text,
                format!(
                    "Here's a response to your prompt: \"{prompt}\". This is a placeholder \
                     response from the Gemini API stub. In a real implementation, this would \
                     be generated content from Google's Gemini AI model."
                ),
            ),
            BlockDescriptor::new(
                BlockKind::List,
                "• Key point one about your request\n• Another relevant detail\n• Summary conclusion",
            ),
        ];
        Ok(GenerateResponse {
            blocks,
            message: Some(Self::MESSAGE.to_string()),
        })
    }
}

/// Asks Gemini for a JSON array of blocks.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: GeminiClient,
}

impl GeminiGenerator {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlockGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<GenerateResponse, BackendError> {
        let reply = self.client.complete(generation_instruction(prompt)).await?;
        Ok(GenerateResponse {
            blocks: parse_blocks(&reply),
            message: None,
        })
    }
}

fn generation_instruction(prompt: &str) -> String {
    format!(
        "Convert the following user prompt into structured blocks for a note-taking app.\n\
         Return a JSON array of blocks where each block has a 'type' (text, heading, list, code, image),\n\
         'content' (the text content), and optional 'metadata' (like level for headings, language for code).\n\
         \n\
         User prompt: {prompt}\n\
         \n\
         Please format your response as valid JSON only."
    )
}

/// Parse a model reply as a block array. Anything that isn't a well-formed
/// array of valid blocks becomes one text block holding the reply.
pub fn parse_blocks(reply: &str) -> Vec<BlockDescriptor> {
    let body = strip_code_fence(reply);
    match serde_json::from_str::<Vec<BlockDescriptor>>(body) {
        Ok(blocks)
            if blocks
                .iter()
                .all(|b| BlockDraft::try_from(b.clone()).is_ok()) =>
        {
            blocks
        }
        Ok(_) => {
            debug!("model returned invalid blocks, falling back to text");
            vec![BlockDescriptor::new(BlockKind::Text, reply.trim())]
        }
        Err(e) => {
            debug!(error = %e, "model reply is not a block array, falling back to text");
            vec![BlockDescriptor::new(BlockKind::Text, reply.trim())]
        }
    }
}

/// Drop a surrounding ```` ```json ```` fence if present.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Skip the info string ("json") on the opening line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}
