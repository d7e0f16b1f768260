//! Batching pipeline error types

use thiserror::Error;

/// Errors surfaced to producers and to the owner of a [`Batcher`](super::Batcher)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// No queue space became available within the bounded enqueue wait
    #[error("Queue is full, retry after {retry_after_ms}ms")]
    QueueFull { retry_after_ms: u64 },

    /// The batcher is stopping and no longer accepts items
    #[error("Batcher is shutting down")]
    ShuttingDown,

    /// The batcher was already stopped
    #[error("Batcher is not running")]
    NotRunning,

    /// The assembler task ended abnormally
    #[error("Assembler task failed: {0}")]
    AssemblerFailed(String),
}

impl BatchError {
    /// Whether the producer may retry the same item later
    pub fn is_retryable(&self) -> bool {
        matches!(self, BatchError::QueueFull { .. })
    }
}
