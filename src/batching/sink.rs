//! Batch sinks
//!
//! A sink receives every assembled batch, one call at a time, on the
//! assembler task. Returning an error makes the assembler retry the same
//! batch according to the delivery policy.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tracing::info;

/// Error reported by a sink for one delivery attempt
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Sink '{sink}' failed: {message}")]
pub struct SinkError {
    pub sink: String,
    pub message: String,
}

impl SinkError {
    pub fn new<S: Into<String>, M: Into<String>>(sink: S, message: M) -> Self {
        Self {
            sink: sink.into(),
            message: message.into(),
        }
    }
}

/// Downstream consumer of completed batches
#[async_trait]
pub trait BatchSink<T>: Send + Sync
where
    T: Send + Sync,
{
    /// Process one batch. The slice is never empty.
    async fn process(&self, batch: &[T]) -> Result<(), SinkError>;

    /// Name used in logs
    fn name(&self) -> &str {
        "sink"
    }
}

/// Sink that only records batch sizes in the log
#[derive(Debug, Default)]
pub struct LoggingSink {
    batches: AtomicU64,
    items: AtomicU64,
}

impl LoggingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of batches seen so far
    pub fn batches(&self) -> u64 {
        self.batches.load(Ordering::Relaxed)
    }

    /// Number of items seen so far
    pub fn items(&self) -> u64 {
        self.items.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<T> BatchSink<T> for LoggingSink
where
    T: Send + Sync,
{
    async fn process(&self, batch: &[T]) -> Result<(), SinkError> {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.items.fetch_add(batch.len() as u64, Ordering::Relaxed);
        info!("Processing batch of {} items.", batch.len());
        Ok(())
    }

    fn name(&self) -> &str {
        "logging"
    }
}

/// Sink that keeps every delivered batch in memory
#[derive(Debug, Default)]
pub struct MemorySink<T> {
    batches: Mutex<Vec<Vec<T>>>,
}

impl<T: Clone> MemorySink<T> {
    pub fn new() -> Self {
        Self {
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Copy of all batches in delivery order
    pub fn batches(&self) -> Vec<Vec<T>> {
        self.batches.lock().clone()
    }

    /// Concatenation of all batches in delivery order
    pub fn items(&self) -> Vec<T> {
        self.batches.lock().iter().flatten().cloned().collect()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().len()
    }
}

#[async_trait]
impl<T> BatchSink<T> for MemorySink<T>
where
    T: Clone + Send + Sync,
{
    async fn process(&self, batch: &[T]) -> Result<(), SinkError> {
        self.batches.lock().push(batch.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
