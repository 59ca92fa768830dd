//! Error types for store operations.

use thiserror::Error;

/// Errors that can occur during store mutations.
///
/// Operations on ids that are not present are *not* errors; they report
/// [`crate::Outcome::Missing`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Reorder index outside `0..len`.
    #[error("index {index} out of bounds for {len} blocks")]
    InvalidIndex { index: usize, len: usize },
}
