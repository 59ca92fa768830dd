//! Block entity model for blocknote.
//!
//! This crate is the leaf every other crate builds on: typed block IDs, the
//! closed set of block kinds, per-kind metadata, and the shapes used to
//! create, patch, and exchange blocks. It has **no internal blocknote
//! dependencies**.
//!
//! # Key Types
//!
//! |---------------------|---------------------------------------------------|
//! | Type                | Purpose                                           |
//! |---------------------|---------------------------------------------------|
//! | [`BlockId`]         | Opaque unique block address (UUIDv7)              |
//! | [`BlockKind`]       | What a block *is* (text, heading, list, ...)      |
//! | [`BlockBody`]       | Kind tag + only the metadata that kind carries    |
//! | [`Block`]           | A live block owned by the store                   |
//! | [`BlockDraft`]      | Creation shape (no id, no timestamps)             |
//! | [`BlockPatch`]      | Partial update applied in place                   |
//! | [`BlockDescriptor`] | Wire shape `{ type, content, metadata? }`         |
//! |---------------------|---------------------------------------------------|

pub mod block;
pub mod descriptor;
pub mod error;
pub mod ids;

pub use block::{Block, BlockBody, BlockDraft, BlockKind, BlockPatch, MAX_HEADING_LEVEL};
pub use descriptor::{BlockDescriptor, BlockMetadata};
pub use error::TypeError;
pub use ids::BlockId;

/// Result type for block model conversions.
pub type Result<T> = std::result::Result<T, TypeError>;

/// Current time as Unix milliseconds. Used by constructors throughout the crate.
pub(crate) fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
