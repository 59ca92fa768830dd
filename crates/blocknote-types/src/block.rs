//! Block kinds, per-kind metadata, and the live `Block` entity.
//!
//! ## Design: BlockKind + BlockBody
//!
//! `BlockKind` is the closed set of what a block *is*. `BlockBody` pairs the
//! kind with only the metadata that kind can carry, so a code block can never
//! hold a heading level and renderers never probe optional fields that do not
//! apply. Every metadata field is itself optional: a heading without a level
//! renders as level 1, an image without a url falls back to its content.

use serde::{Deserialize, Serialize};
use strum::EnumString;

use crate::ids::BlockId;

/// Deepest heading level a renderer will emit. Larger levels clamp to this.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// What a block *is* (content type).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum BlockKind {
    /// Plain paragraph text.
    #[default]
    Text,
    /// Section heading; level lives in [`BlockBody::Heading`].
    Heading,
    /// Bullet list, one item per line.
    List,
    /// Source code; language tag lives in [`BlockBody::Code`].
    Code,
    /// Image reference; url and alt text live in [`BlockBody::Image`].
    Image,
}

impl BlockKind {
    /// Every kind, in picker order.
    pub const ALL: [BlockKind; 5] = [
        BlockKind::Text,
        BlockKind::Heading,
        BlockKind::List,
        BlockKind::Code,
        BlockKind::Image,
    ];

    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Text => "text",
            BlockKind::Heading => "heading",
            BlockKind::List => "list",
            BlockKind::Code => "code",
            BlockKind::Image => "image",
        }
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind tag plus the metadata relevant to that kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockBody {
    #[default]
    Text,
    Heading {
        /// Heading level (≥ 1). `None` renders as level 1.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        level: Option<u8>,
    },
    List,
    Code {
        /// Language tag for highlighting (e.g. "rust").
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Image {
        /// Alternative text, also shown as a caption.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
        /// Image source. Falls back to the block content when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
}

impl BlockBody {
    /// A body of the given kind with no metadata set.
    pub fn bare(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => BlockBody::Text,
            BlockKind::Heading => BlockBody::Heading { level: None },
            BlockKind::List => BlockBody::List,
            BlockKind::Code => BlockBody::Code { language: None },
            BlockKind::Image => BlockBody::Image {
                alt: None,
                url: None,
            },
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            BlockBody::Text => BlockKind::Text,
            BlockBody::Heading { .. } => BlockKind::Heading,
            BlockBody::List => BlockKind::List,
            BlockBody::Code { .. } => BlockKind::Code,
            BlockBody::Image { .. } => BlockKind::Image,
        }
    }

    /// Effective heading level in `1..=MAX_HEADING_LEVEL`, or `None` for
    /// non-heading bodies.
    pub fn heading_level(&self) -> Option<u8> {
        match self {
            BlockBody::Heading { level } => {
                Some(level.unwrap_or(1).clamp(1, MAX_HEADING_LEVEL))
            }
            _ => None,
        }
    }

    /// Language tag of a code body.
    pub fn language(&self) -> Option<&str> {
        match self {
            BlockBody::Code { language } => language.as_deref(),
            _ => None,
        }
    }
}

/// Creation shape for a block: everything except id and timestamps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDraft {
    #[serde(flatten)]
    pub body: BlockBody,
    pub content: String,
}

impl BlockDraft {
    pub fn new(body: BlockBody, content: impl Into<String>) -> Self {
        Self {
            body,
            content: content.into(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::new(BlockBody::Text, content)
    }

    pub fn heading(level: u8, content: impl Into<String>) -> Self {
        Self::new(BlockBody::Heading { level: Some(level) }, content)
    }

    pub fn list(content: impl Into<String>) -> Self {
        Self::new(BlockBody::List, content)
    }

    pub fn code(language: Option<&str>, content: impl Into<String>) -> Self {
        Self::new(
            BlockBody::Code {
                language: language.map(str::to_string),
            },
            content,
        )
    }

    pub fn image(url: impl Into<String>, alt: Option<&str>) -> Self {
        let url = url.into();
        Self::new(
            BlockBody::Image {
                alt: alt.map(str::to_string),
                url: Some(url.clone()),
            },
            url,
        )
    }

    /// Starter block offered by the "add block" picker for each kind.
    pub fn template(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Text => Self::text("Start typing..."),
            BlockKind::Heading => Self::heading(1, "New Heading"),
            BlockKind::List => Self::list("• First item\n• Second item\n• Third item"),
            BlockKind::Code => Self::code(Some("javascript"), "// Enter your code here"),
            BlockKind::Image => Self::new(
                BlockBody::Image {
                    alt: None,
                    url: None,
                },
                "https://via.placeholder.com/400x200",
            ),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }
}

/// Partial update merged into an existing block.
///
/// Absent fields are left untouched. Replacing `body` may change the kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BlockBody>,
}

impl BlockPatch {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            body: None,
        }
    }

    pub fn body(body: BlockBody) -> Self {
        Self {
            content: None,
            body: Some(body),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_body(mut self, body: BlockBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.body.is_none()
    }
}

/// A live block. Only the store constructs and mutates these.
///
/// `id` and `created_at` are fixed at creation. `updated_at` moves forward on
/// every [`Block::apply`], never on reorder or selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    id: BlockId,
    #[serde(flatten)]
    body: BlockBody,
    content: String,
    /// Timestamp when block was created (Unix millis).
    created_at: u64,
    /// Timestamp of the last content/metadata change (Unix millis).
    updated_at: u64,
}

impl Block {
    /// Materialize a draft with a fresh id and both timestamps set to now.
    pub fn new(draft: BlockDraft) -> Self {
        let now = crate::now_millis();
        Self {
            id: BlockId::new(),
            body: draft.body,
            content: draft.content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.body.kind()
    }

    pub fn body(&self) -> &BlockBody {
        &self.body
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    pub fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Merge a patch and refresh `updated_at`.
    ///
    /// The new timestamp is strictly greater than the previous one even when
    /// two edits land within the same millisecond.
    pub fn apply(&mut self, patch: BlockPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        self.updated_at = crate::now_millis().max(self.updated_at + 1);
    }
}
