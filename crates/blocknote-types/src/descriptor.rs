//! Wire shape for blocks crossing the generation endpoint.
//!
//! ```text
//! { "type": "heading", "content": "Title", "metadata": { "level": 2 } }
//! ```
//!
//! The metadata bag is loose on the wire (any field on any kind). Converting
//! into a [`BlockDraft`] keeps only the fields the kind understands and
//! rejects values that could never render, such as heading level 0.

use serde::{Deserialize, Deserializer, Serialize};

use crate::block::{Block, BlockBody, BlockDraft, BlockKind};
use crate::TypeError;

/// Loose per-block metadata as it appears on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMetadata {
    #[serde(
        default,
        deserialize_with = "saturating_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Levels past `u8::MAX` saturate; renderers clamp to six anyway.
fn saturating_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let level = Option::<u64>::deserialize(deserializer)?;
    Ok(level.map(|l| u8::try_from(l).unwrap_or(u8::MAX)))
}

impl BlockMetadata {
    fn is_empty(&self) -> bool {
        self.level.is_none() && self.language.is_none() && self.alt.is_none() && self.url.is_none()
    }
}

/// A block as exchanged with the generation endpoint: `{ type, content, metadata? }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BlockMetadata>,
}

impl BlockDescriptor {
    pub fn new(kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: BlockMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Validate and convert into a draft.
    pub fn into_draft(self) -> Result<BlockDraft, TypeError> {
        BlockDraft::try_from(self)
    }
}

impl TryFrom<BlockDescriptor> for BlockDraft {
    type Error = TypeError;

    fn try_from(desc: BlockDescriptor) -> Result<Self, Self::Error> {
        let meta = desc.metadata.unwrap_or_default();
        let body = match desc.kind {
            BlockKind::Text => BlockBody::Text,
            BlockKind::List => BlockBody::List,
            BlockKind::Heading => {
                if meta.level == Some(0) {
                    return Err(TypeError::InvalidDescriptor(
                        "heading level must be at least 1".to_string(),
                    ));
                }
                BlockBody::Heading { level: meta.level }
            }
            BlockKind::Code => BlockBody::Code {
                language: meta.language.filter(|l| !l.trim().is_empty()),
            },
            BlockKind::Image => BlockBody::Image {
                alt: meta.alt,
                url: meta.url,
            },
        };
        Ok(BlockDraft::new(body, desc.content))
    }
}

impl From<&BlockBody> for BlockMetadata {
    fn from(body: &BlockBody) -> Self {
        match body {
            BlockBody::Text | BlockBody::List => BlockMetadata::default(),
            BlockBody::Heading { level } => BlockMetadata {
                level: *level,
                ..Default::default()
            },
            BlockBody::Code { language } => BlockMetadata {
                language: language.clone(),
                ..Default::default()
            },
            BlockBody::Image { alt, url } => BlockMetadata {
                alt: alt.clone(),
                url: url.clone(),
                ..Default::default()
            },
        }
    }
}

impl From<&BlockDraft> for BlockDescriptor {
    fn from(draft: &BlockDraft) -> Self {
        let metadata = BlockMetadata::from(&draft.body);
        Self {
            kind: draft.kind(),
            content: draft.content.clone(),
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}

impl From<&Block> for BlockDescriptor {
    fn from(block: &Block) -> Self {
        let metadata = BlockMetadata::from(block.body());
        Self {
            kind: block.kind(),
            content: block.content().to_string(),
            metadata: (!metadata.is_empty()).then_some(metadata),
        }
    }
}
