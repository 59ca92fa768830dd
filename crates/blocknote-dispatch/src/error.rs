//! Error type for dispatch and client operations.

/// Why a prompt (or summary request) produced no blocks.
///
/// None of these are fatal. The store is never modified when one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Prompt was empty after trimming; no request was sent.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// Content to summarize was empty; no request was sent.
    #[error("content is empty")]
    EmptyContent,

    /// Endpoint unreachable, timed out, or the connection failed.
    #[error("network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status.
    #[error("endpoint returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape, or a block in it was
    /// invalid. Nothing from the batch was applied.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A newer prompt was submitted while this one was in flight.
    #[error("superseded by a newer prompt")]
    Superseded,

    /// The in-flight request was cancelled explicitly.
    #[error("request cancelled")]
    Cancelled,

    /// Client could not be constructed from configuration.
    #[error("client configuration error: {0}")]
    Config(String),
}

impl DispatchError {
    /// Check if this error came from a newer request or an explicit cancel
    /// rather than a failure worth showing the user.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, DispatchError::Superseded | DispatchError::Cancelled)
    }
}

