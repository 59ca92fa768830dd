//! The block store: ordered blocks, selection, loading flag, change events.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use blocknote_types::{Block, BlockDraft, BlockId, BlockPatch};

use crate::reorder::move_item;
use crate::{Result, StoreError};

/// Capacity of the change-event channel. Slow subscribers see `Lagged`.
const EVENT_CAPACITY: usize = 1024;

/// Events broadcast when the store changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A block was appended at `index`.
    BlockAdded { id: BlockId, index: usize },
    /// A block's content or metadata changed.
    BlockUpdated { id: BlockId },
    /// A block was removed from `index`.
    BlockDeleted { id: BlockId, index: usize },
    /// A block moved from one position to another.
    BlockMoved { id: BlockId, from: usize, to: usize },
    /// Selection changed (including implicit clears).
    SelectionChanged { selected: Option<BlockId> },
    /// All blocks were removed.
    Cleared { removed: usize },
    /// A generation request started or finished.
    LoadingChanged { loading: bool },
}

/// Whether an id-addressed operation found its target.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The block existed and the operation took effect.
    Applied,
    /// No block with that id; nothing changed.
    Missing,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Single source of truth for a document's blocks and selection.
pub struct BlockStore {
    /// Blocks in display order.
    blocks: Vec<Block>,
    /// Currently selected block, if any. Not checked against `blocks`.
    selected: Option<BlockId>,
    /// Whether a generation request is outstanding.
    loading: bool,
    /// Store version (bumped on any mutation).
    version: u64,
    /// Event broadcaster.
    event_tx: broadcast::Sender<StoreEvent>,
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for BlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockStore")
            .field("blocks", &self.blocks.len())
            .field("selected", &self.selected)
            .field("loading", &self.loading)
            .field("version", &self.version)
            .finish()
    }
}

impl BlockStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            blocks: Vec::new(),
            selected: None,
            loading: false,
            version: 0,
            event_tx,
        }
    }

    /// Get the event receiver for subscribing to changes.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&mut self, event: StoreEvent) {
        self.version += 1;
        tracing::trace!(version = self.version, ?event, "store event");
        // No subscribers is fine: nothing is rendering yet.
        let _ = self.event_tx.send(event);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Blocks in display order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == *id)
    }

    /// Current index of a block.
    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == *id)
    }

    pub fn contains(&self, id: &BlockId) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The selected id, which may name a block that no longer exists.
    pub fn selected(&self) -> Option<BlockId> {
        self.selected
    }

    /// The selected block, if the selection resolves to one.
    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.and_then(|id| self.get(&id))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Get the current version.
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Append a new block built from `draft`. Returns its fresh id.
    pub fn add_block(&mut self, draft: BlockDraft) -> BlockId {
        let block = Block::new(draft);
        let id = block.id();
        debug_assert!(!self.contains(&id), "block id collision: {id}");

        let index = self.blocks.len();
        self.blocks.push(block);
        tracing::debug!(block_id = %id, index, "block added");
        self.emit(StoreEvent::BlockAdded { id, index });
        id
    }

    /// Append several blocks in order.
    pub fn add_blocks(&mut self, drafts: impl IntoIterator<Item = BlockDraft>) -> Vec<BlockId> {
        drafts.into_iter().map(|d| self.add_block(d)).collect()
    }

    /// Merge `patch` into the block with `id` and refresh its `updated_at`.
    pub fn update_block(&mut self, id: &BlockId, patch: BlockPatch) -> Outcome {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id() == *id) else {
            tracing::debug!(block_id = %id, "update_block: no such block");
            return Outcome::Missing;
        };
        block.apply(patch);
        self.emit(StoreEvent::BlockUpdated { id: *id });
        Outcome::Applied
    }

    /// Remove the block with `id`, clearing the selection if it pointed there.
    pub fn delete_block(&mut self, id: &BlockId) -> Outcome {
        let Some(index) = self.position(id) else {
            tracing::debug!(block_id = %id, "delete_block: no such block");
            return Outcome::Missing;
        };
        self.blocks.remove(index);
        tracing::debug!(block_id = %id, index, "block deleted");
        self.emit(StoreEvent::BlockDeleted { id: *id, index });

        if self.selected == Some(*id) {
            self.selected = None;
            self.emit(StoreEvent::SelectionChanged { selected: None });
        }
        Outcome::Applied
    }

    /// Move the block at `from` so it ends up at `to`.
    ///
    /// Single-element move, not a swap: `[A,B,C,D]` with `(0, 2)` becomes
    /// `[B,C,A,D]`. Both indices must be `< len()`.
    pub fn reorder_blocks(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.blocks.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::InvalidIndex { index, len });
            }
        }
        if from == to {
            return Ok(());
        }

        let id = self.blocks[from].id();
        move_item(&mut self.blocks, from, to);
        tracing::debug!(block_id = %id, from, to, "block moved");
        self.emit(StoreEvent::BlockMoved { id, from, to });
        Ok(())
    }

    /// Set or clear the selection. The id is not checked against the blocks.
    pub fn select_block(&mut self, id: Option<BlockId>) {
        self.selected = id;
        self.emit(StoreEvent::SelectionChanged { selected: id });
    }

    /// Select `id`, or clear the selection if it is already selected.
    pub fn toggle_selection(&mut self, id: BlockId) {
        let next = if self.selected == Some(id) { None } else { Some(id) };
        self.select_block(next);
    }

    /// Remove every block and clear the selection.
    pub fn clear_blocks(&mut self) {
        let removed = self.blocks.len();
        self.blocks.clear();
        self.selected = None;
        tracing::debug!(removed, "blocks cleared");
        self.emit(StoreEvent::Cleared { removed });
    }

    /// Record whether a generation request is in flight.
    pub fn set_loading(&mut self, loading: bool) {
        if self.loading == loading {
            return;
        }
        self.loading = loading;
        self.emit(StoreEvent::LoadingChanged { loading });
    }
}

/// Thread-safe shared store handle.
pub type SharedBlockStore = Arc<RwLock<BlockStore>>;

/// Create a new shared block store.
pub fn shared_block_store() -> SharedBlockStore {
    Arc::new(RwLock::new(BlockStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blocknote_types::{BlockBody, BlockKind};
    use std::collections::HashSet;

    fn store_with(contents: &[&str]) -> (BlockStore, Vec<BlockId>) {
        let mut store = BlockStore::new();
        let ids = contents
            .iter()
            .map(|c| store.add_block(BlockDraft::text(*c)))
            .collect();
        (store, ids)
    }

    fn contents(store: &BlockStore) -> Vec<&str> {
        store.blocks().iter().map(|b| b.content()).collect()
    }

    #[test]
    fn test_new_store() {
        let store = BlockStore::new();
        assert!(store.is_empty());
        assert_eq!(store.selected(), None);
        assert!(!store.is_loading());
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_add_appends_with_unique_ids() {
        let (mut store, ids) = store_with(&["a", "b", "c"]);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), 3);

        let id = store.add_block(BlockDraft::heading(2, "d"));
        assert_eq!(store.blocks().last().unwrap().id(), id);
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(&id).unwrap().kind(), BlockKind::Heading);
    }

    #[test]
    fn test_add_blocks_preserves_order() {
        let mut store = BlockStore::new();
        let ids = store.add_blocks([
            BlockDraft::heading(1, "Title"),
            BlockDraft::text("Body"),
        ]);
        assert_eq!(ids.len(), 2);
        assert_eq!(contents(&store), vec!["Title", "Body"]);
        assert_eq!(store.position(&ids[1]), Some(1));
    }

    #[test]
    fn test_update_changes_only_target() {
        let (mut store, ids) = store_with(&["a", "b"]);
        let before_target = store.get(&ids[0]).unwrap().clone();
        let before_other = store.get(&ids[1]).unwrap().clone();

        let outcome = store.update_block(&ids[0], BlockPatch::content("x"));
        assert_eq!(outcome, Outcome::Applied);

        let after = store.get(&ids[0]).unwrap();
        assert_eq!(after.content(), "x");
        assert!(after.updated_at() > before_target.updated_at());
        assert_eq!(after.id(), before_target.id());
        assert_eq!(after.body(), before_target.body());
        assert_eq!(after.created_at(), before_target.created_at());
        assert_eq!(store.get(&ids[1]).unwrap(), &before_other);
    }

    #[test]
    fn test_update_missing_reports_missing() {
        let (mut store, _) = store_with(&["a"]);
        let version = store.version();
        let outcome = store.update_block(&BlockId::new(), BlockPatch::content("x"));
        assert_eq!(outcome, Outcome::Missing);
        assert_eq!(store.version(), version);
        assert_eq!(contents(&store), vec!["a"]);
    }

    #[test]
    fn test_update_body_switches_kind() {
        let (mut store, ids) = store_with(&["let x = 1;"]);
        let outcome = store.update_block(
            &ids[0],
            BlockPatch::body(BlockBody::Code {
                language: Some("rust".into()),
            }),
        );
        assert!(outcome.is_applied());
        assert_eq!(store.get(&ids[0]).unwrap().kind(), BlockKind::Code);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let (mut store, ids) = store_with(&["a", "b", "c", "d"]);
        assert_eq!(store.delete_block(&ids[1]), Outcome::Applied);
        assert_eq!(contents(&store), vec!["a", "c", "d"]);
        assert_eq!(store.delete_block(&ids[1]), Outcome::Missing);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_delete_clears_matching_selection() {
        let (mut store, ids) = store_with(&["a", "b"]);
        store.select_block(Some(ids[0]));
        assert!(store.delete_block(&ids[1]).is_applied());
        assert_eq!(store.selected(), Some(ids[0]));

        let _ = store.delete_block(&ids[0]);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_reorder_moves_not_swaps() {
        let (mut store, ids) = store_with(&["A", "B", "C", "D"]);
        store.reorder_blocks(0, 2).unwrap();
        assert_eq!(contents(&store), vec!["B", "C", "A", "D"]);
        assert_eq!(store.position(&ids[0]), Some(2));

        store.reorder_blocks(3, 0).unwrap();
        assert_eq!(contents(&store), vec!["D", "B", "C", "A"]);
    }

    #[test]
    fn test_reorder_keeps_identities_and_timestamps() {
        let (mut store, _) = store_with(&["A", "B", "C"]);
        let before: Vec<Block> = store.blocks().to_vec();
        store.reorder_blocks(2, 0).unwrap();

        let mut after: Vec<Block> = store.blocks().to_vec();
        let mut sorted_before = before.clone();
        after.sort_by_key(|b| b.id());
        sorted_before.sort_by_key(|b| b.id());
        assert_eq!(after, sorted_before);
    }

    #[test]
    fn test_reorder_rejects_out_of_range() {
        let (mut store, _) = store_with(&["A", "B"]);
        assert_eq!(
            store.reorder_blocks(2, 0),
            Err(StoreError::InvalidIndex { index: 2, len: 2 })
        );
        assert_eq!(
            store.reorder_blocks(0, 5),
            Err(StoreError::InvalidIndex { index: 5, len: 2 })
        );
        assert_eq!(contents(&store), vec!["A", "B"]);

        let mut empty = BlockStore::new();
        assert!(empty.reorder_blocks(0, 0).is_err());
    }

    #[test]
    fn test_reorder_same_index_is_noop() {
        let (mut store, _) = store_with(&["A", "B"]);
        let version = store.version();
        store.reorder_blocks(1, 1).unwrap();
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_select_accepts_unknown_id() {
        let mut store = BlockStore::new();
        let ghost = BlockId::new();
        store.select_block(Some(ghost));
        assert_eq!(store.selected(), Some(ghost));
        assert!(store.selected_block().is_none());
        store.select_block(None);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_toggle_selection() {
        let (mut store, ids) = store_with(&["a"]);
        store.toggle_selection(ids[0]);
        assert_eq!(store.selected(), Some(ids[0]));
        store.toggle_selection(ids[0]);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (mut store, ids) = store_with(&["a", "b"]);
        store.select_block(Some(ids[0]));
        store.clear_blocks();
        assert!(store.is_empty());
        assert_eq!(store.selected(), None);
        store.clear_blocks();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_select_delete_scenario() {
        let mut store = BlockStore::new();
        let id = store.add_block(BlockDraft::text("hello"));
        assert_eq!(store.len(), 1);
        store.select_block(Some(id));
        assert_eq!(store.selected(), Some(id));
        assert_eq!(store.delete_block(&id), Outcome::Applied);
        assert_eq!(store.len(), 0);
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_events_are_broadcast_in_order() {
        let mut store = BlockStore::new();
        let mut rx = store.subscribe();

        let id = store.add_block(BlockDraft::text("a"));
        store.select_block(Some(id));
        let _ = store.delete_block(&id);
        store.set_loading(true);

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::BlockAdded { id, index: 0 });
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::SelectionChanged { selected: Some(id) }
        );
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::BlockDeleted { id, index: 0 });
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::SelectionChanged { selected: None }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            StoreEvent::LoadingChanged { loading: true }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_set_loading_only_emits_on_change() {
        let mut store = BlockStore::new();
        store.set_loading(false);
        assert_eq!(store.version(), 0);
        store.set_loading(true);
        store.set_loading(true);
        assert_eq!(store.version(), 1);
        assert!(store.is_loading());
    }

    #[test]
    fn test_shared_store_handle() {
        let shared = shared_block_store();
        let id = shared.write().add_block(BlockDraft::text("x"));
        assert!(shared.read().contains(&id));
    }
}
