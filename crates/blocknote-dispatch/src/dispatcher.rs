//! Prompt → blocks.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use blocknote_store::SharedBlockStore;
use blocknote_types::{BlockDraft, BlockId};

use crate::client::GenerationClient;
use crate::error::DispatchError;

/// Bookkeeping for the request currently allowed to apply.
#[derive(Debug, Default)]
struct Inflight {
    /// Bumped on every submit; a response applies only if it still matches.
    generation: u64,
    token: Option<CancellationToken>,
    /// Submits that have started and not yet finished, superseded ones included.
    outstanding: usize,
}

/// Sends prompts to a [`GenerationClient`] and appends the resulting blocks
/// to a shared store.
///
/// At most one prompt is current. Submitting while another is in flight
/// cancels the earlier one, which then returns [`DispatchError::Superseded`]
/// without touching the store. A response is validated as a whole before any
/// block is added: one bad descriptor discards the batch.
///
/// The store's loading flag is raised when a submit starts and lowered when
/// the last outstanding submit finishes, whatever its outcome.
pub struct PromptDispatcher {
    client: Arc<dyn GenerationClient>,
    store: SharedBlockStore,
    state: Mutex<Inflight>,
}

impl std::fmt::Debug for PromptDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PromptDispatcher")
            .field("generation", &state.generation)
            .field("outstanding", &state.outstanding)
            .finish_non_exhaustive()
    }
}

/// Lowers the loading flag when the last outstanding submit ends, including
/// when the submit future is dropped mid-request.
struct FinishGuard<'a> {
    dispatcher: &'a PromptDispatcher,
}

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.dispatcher.state.lock();
        state.outstanding = state.outstanding.saturating_sub(1);
        if state.outstanding == 0 {
            state.token = None;
            self.dispatcher.store.write().set_loading(false);
        }
    }
}

impl PromptDispatcher {
    pub fn new(client: Arc<dyn GenerationClient>, store: SharedBlockStore) -> Self {
        Self {
            client,
            store,
            state: Mutex::new(Inflight::default()),
        }
    }

    /// The store blocks are appended to.
    pub fn store(&self) -> &SharedBlockStore {
        &self.store
    }

    /// Check if any submit is still waiting on the endpoint.
    pub fn is_in_flight(&self) -> bool {
        self.state.lock().outstanding > 0
    }

    /// Cancel the current request, if any. Its submit returns
    /// [`DispatchError::Cancelled`].
    pub fn cancel(&self) {
        let state = self.state.lock();
        if let Some(token) = &state.token {
            debug!(generation = state.generation, "cancelling prompt");
            token.cancel();
        }
    }

    /// Submit a prompt and append the generated blocks in response order.
    ///
    /// Returns the ids of the new blocks. On any error the store is left as
    /// it was, apart from the loading flag.
    pub async fn submit(&self, prompt: &str) -> Result<Vec<BlockId>, DispatchError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(DispatchError::EmptyPrompt);
        }

        let (generation, token) = {
            let mut state = self.state.lock();
            if let Some(previous) = state.token.take() {
                previous.cancel();
            }
            state.generation += 1;
            state.outstanding += 1;
            let token = CancellationToken::new();
            state.token = Some(token.clone());
            (state.generation, token)
        };
        let _finish = FinishGuard { dispatcher: self };
        self.store.write().set_loading(true);

        debug!(generation, prompt_len = prompt.len(), "submitting prompt");
        let result = self.run(prompt, generation, &token).await;
        match &result {
            Ok(ids) => info!(generation, blocks = ids.len(), "prompt applied"),
            Err(e) if e.is_cancellation() => debug!(generation, error = %e, "prompt dropped"),
            Err(e) => warn!(generation, error = %e, "prompt failed"),
        }
        result
    }

    async fn run(
        &self,
        prompt: &str,
        generation: u64,
        token: &CancellationToken,
    ) -> Result<Vec<BlockId>, DispatchError> {
        let response = tokio::select! {
            _ = token.cancelled() => return Err(self.dropped_reason(generation)),
            response = self.client.generate(prompt) => response?,
        };

        let drafts = response
            .blocks
            .into_iter()
            .enumerate()
            .map(|(i, descriptor)| {
                BlockDraft::try_from(descriptor)
                    .map_err(|e| DispatchError::Malformed(format!("block {i}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Checked and applied under the state lock so a submit or cancel
        // racing with this response cannot interleave.
        let state = self.state.lock();
        if state.generation != generation {
            return Err(DispatchError::Superseded);
        }
        if token.is_cancelled() {
            return Err(DispatchError::Cancelled);
        }
        Ok(self.store.write().add_blocks(drafts))
    }

    fn dropped_reason(&self, generation: u64) -> DispatchError {
        if self.state.lock().generation != generation {
            DispatchError::Superseded
        } else {
            DispatchError::Cancelled
        }
    }
}
