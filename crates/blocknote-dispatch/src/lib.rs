//! Prompt dispatch for blocknote.
//!
//! Turns a free-text prompt into one request against the generation
//! endpoint and a batch of new blocks appended to a [`SharedBlockStore`].
//!
//! ```text
//! "meeting notes for friday"
//!     ↓ PromptDispatcher::submit (trim, supersede any in-flight request)
//! POST /api/generate { "prompt": "meeting notes for friday" }
//!     ↓ GenerationClient
//! { "blocks": [{ "type": "heading", ... }, { "type": "text", ... }] }
//!     ↓ validate every descriptor, then apply the whole batch
//! BlockStore::add_blocks
//! ```
//!
//! The summarization client for the markdown block's "AI Summary" action
//! lives here too, along with the TOML configuration shared by the CLI and
//! the server.
//!
//! [`SharedBlockStore`]: blocknote_store::SharedBlockStore

pub mod client;
pub mod config;
mod dispatcher;
mod error;
pub mod wire;

pub use client::{GenerationClient, HttpGenerationClient, HttpSummarizeClient, SummarizeClient};
pub use config::{BlocknoteConfig, ClientConfig, ConfigError, GeminiConfig, ServerConfig};
pub use dispatcher::PromptDispatcher;
pub use error::DispatchError;
pub use wire::{
    ErrorBody, GenerateRequest, GenerateResponse, SummarizeKind, SummarizeRequest,
    SummarizeResponse,
};

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
