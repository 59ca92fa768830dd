//! Reorder engine: drag gestures to array moves.
//!
//! The interaction layer reports a drag as `(active, over)`: the block being
//! dragged and the block under the pointer when it was dropped. We locate
//! both ids in the current sequence and move `active` to `over`'s index. If
//! either id is gone (deleted while the drag was in progress) the move is
//! abandoned without touching the store.

use blocknote_types::{Block, BlockId};

use crate::BlockStore;

/// Result of applying a drag gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// The active block moved from `from` to `to`.
    Moved { from: usize, to: usize },
    /// Dropped onto itself.
    Unchanged,
    /// One of the ids no longer exists; nothing changed.
    Abandoned,
}

/// Remove the element at `from` and reinsert it at `to`.
///
/// Callers must ensure both indices are in bounds.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// Translate a drag pair into `(from, to)` indices.
pub fn resolve_drag(blocks: &[Block], active: &BlockId, over: &BlockId) -> Option<(usize, usize)> {
    let from = blocks.iter().position(|b| b.id() == *active)?;
    let to = blocks.iter().position(|b| b.id() == *over)?;
    Some((from, to))
}

impl BlockStore {
    /// Apply a drag gesture that dropped `active` onto `over`.
    pub fn reorder_by_ids(&mut self, active: &BlockId, over: &BlockId) -> DragOutcome {
        if active == over {
            return DragOutcome::Unchanged;
        }
        let Some((from, to)) = resolve_drag(self.blocks(), active, over) else {
            tracing::debug!(%active, %over, "drag abandoned: block no longer present");
            return DragOutcome::Abandoned;
        };
        match self.reorder_blocks(from, to) {
            Ok(()) => DragOutcome::Moved { from, to },
            // Indices came from the live sequence, so this cannot happen.
            Err(e) => {
                tracing::warn!(error = %e, "drag resolved to invalid indices");
                DragOutcome::Abandoned
            }
        }
    }
}
