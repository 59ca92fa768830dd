//! Owned block store for blocknote documents.
//!
//! A document is an ordered `Vec<Block>` plus an optional selection. The
//! [`BlockStore`] is the only owner of those blocks and the only way to
//! mutate them. Every mutation bumps a version counter and broadcasts a
//! [`StoreEvent`] before returning, so observers always see the new state
//! before the next interaction is processed.
//!
//! # Concurrency Model
//!
//! - `BlockStore` itself is plain `&mut self` state
//! - [`SharedBlockStore`] wraps it in `Arc<parking_lot::RwLock<_>>` for tasks
//!   that outlive a single borrow (the prompt dispatcher, the CLI)
//! - Never hold the lock across an `.await`
//!
//! # Reordering
//!
//! [`BlockStore::reorder_blocks`] is the index-based array move. Drag
//! gestures arrive as `(active, over)` id pairs and go through
//! [`BlockStore::reorder_by_ids`], which abandons the move if either id has
//! disappeared (a delete racing the drag).

mod error;
pub mod reorder;
mod store;

pub use error::StoreError;
pub use reorder::{move_item, resolve_drag, DragOutcome};
pub use store::{shared_block_store, BlockStore, Outcome, SharedBlockStore, StoreEvent};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
