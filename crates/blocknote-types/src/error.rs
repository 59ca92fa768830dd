//! Error types for block model conversions.

use thiserror::Error;

/// Errors raised while building blocks from untrusted input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A descriptor that parsed but cannot become a block.
    #[error("invalid block descriptor: {0}")]
    InvalidDescriptor(String),

    /// A block id string that is not a UUID.
    #[error("invalid block id {input:?}: {reason}")]
    InvalidId { input: String, reason: String },
}
