//! Batcher lifecycle and ingestion API

use super::assembler::BatchAssembler;
use super::error::BatchError;
use super::queue::{BoundedQueue, QueueError};
use super::sink::BatchSink;
use super::stats::{BatcherStats, StatsSnapshot};
use crate::config::{BatchingConfig, DeliveryConfig, Validate};
use crate::utils::error::{Result, RetryPolicy, ServiceError};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// One bounded queue plus the assembler task draining it.
///
/// Producers call [`submit`](Self::submit); the assembler delivers batches to
/// the sink in the background. [`shutdown`](Self::shutdown) stops intake and
/// applies the configured shutdown policy to whatever is still undelivered.
pub struct Batcher<T> {
    queue: Arc<BoundedQueue<T>>,
    stats: Arc<BatcherStats>,
    cancel: CancellationToken,
    handle: Mutex<Option<JoinHandle<()>>>,
    enqueue_timeout: Option<Duration>,
    linger: Duration,
}

impl<T> Batcher<T>
where
    T: Send + Sync + 'static,
{
    /// Validate the configuration and spawn the assembler task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: &BatchingConfig,
        delivery: &DeliveryConfig,
        sink: Arc<dyn BatchSink<T>>,
    ) -> Result<Self> {
        Self::start_with_token(config, delivery, sink, CancellationToken::new())
    }

    /// Like [`start`](Self::start), stopping when `cancel` fires.
    pub fn start_with_token(
        config: &BatchingConfig,
        delivery: &DeliveryConfig,
        sink: Arc<dyn BatchSink<T>>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| ServiceError::Config(format!("Batching config error: {}", e)))?;
        delivery
            .validate()
            .map_err(|e| ServiceError::Config(format!("Delivery config error: {}", e)))?;

        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        let stats = Arc::new(BatcherStats::new());
        let retry = RetryPolicy::new(delivery.into());

        let assembler = BatchAssembler::new(
            queue.clone(),
            sink,
            config,
            retry,
            stats.clone(),
            cancel.clone(),
        );
        let handle = tokio::spawn(assembler.run());

        info!(
            queue_capacity = config.queue_capacity,
            max_batch_size = config.max_batch_size,
            linger_ms = config.linger_ms,
            shutdown_policy = ?config.shutdown_policy,
            "Batcher started"
        );

        Ok(Self {
            queue,
            stats,
            cancel,
            handle: Mutex::new(Some(handle)),
            enqueue_timeout: config.enqueue_timeout(),
            linger: config.linger(),
        })
    }

    /// Queue one item for batching.
    ///
    /// Returns as soon as the item is queued; it never waits for the batch
    /// to be assembled or delivered. If the future is dropped while waiting
    /// for space, the item is not queued and the loss is counted.
    pub async fn submit(&self, item: T) -> std::result::Result<(), BatchError> {
        let guard = CancelGuard::new(&self.stats);

        let outcome = match self.enqueue_timeout {
            Some(wait) => self.queue.enqueue_timeout(item, wait).await,
            None => self.queue.enqueue(item).await,
        };
        guard.disarm();

        self.record(outcome)
    }

    /// Queue one item only if there is room right now.
    pub fn try_submit(&self, item: T) -> std::result::Result<(), BatchError> {
        let outcome = self.queue.try_enqueue(item);
        self.record(outcome)
    }

    fn record(
        &self,
        outcome: std::result::Result<(), QueueError<T>>,
    ) -> std::result::Result<(), BatchError> {
        match outcome {
            Ok(()) => {
                self.stats.record_accepted();
                Ok(())
            }
            Err(QueueError::Full(_)) => {
                self.stats.record_rejected_full();
                debug!(depth = self.queue.len(), "Rejected item, queue full");
                Err(BatchError::QueueFull {
                    retry_after_ms: (self.linger.as_millis() as u64).max(1),
                })
            }
            Err(QueueError::Closed(_)) => {
                self.stats.record_rejected_shutdown();
                Err(BatchError::ShuttingDown)
            }
        }
    }

    /// Stop intake, let the assembler apply the shutdown policy, and wait
    /// for it to finish.
    pub async fn shutdown(&self) -> std::result::Result<(), BatchError> {
        let handle = self.handle.lock().take();
        let Some(handle) = handle else {
            return Err(BatchError::NotRunning);
        };

        info!(queued = self.queue.len(), "Shutting down batcher");
        self.queue.close();
        self.cancel.cancel();

        handle
            .await
            .map_err(|e| BatchError::AssemblerFailed(e.to_string()))?;

        let stats = self.stats();
        info!(
            accepted = stats.accepted,
            items_delivered = stats.items_delivered,
            batches_delivered = stats.batches_delivered,
            items_dropped = stats.items_dropped,
            "Batcher stopped"
        );
        Ok(())
    }

    /// Whether the batcher still accepts items
    pub fn is_running(&self) -> bool {
        !self.queue.is_closed() && !self.cancel.is_cancelled()
    }

    /// Token that stops the assembler when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Current counters and queue depth
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(self.queue.len(), self.queue.capacity())
    }

    /// Number of items waiting to be batched
    pub fn queue_depth(&self) -> usize {
        self.queue.len()
    }

    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }
}

impl<T> Drop for Batcher<T> {
    fn drop(&mut self) {
        // The detached assembler still applies the shutdown policy
        if self.handle.get_mut().is_some() {
            self.queue.close();
            self.cancel.cancel();
        }
    }
}

/// Counts a submit whose future was dropped before the enqueue finished
struct CancelGuard<'a> {
    stats: &'a BatcherStats,
    armed: bool,
}

impl<'a> CancelGuard<'a> {
    fn new(stats: &'a BatcherStats) -> Self {
        Self { stats, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.stats.record_cancelled();
            warn!("Submit cancelled while waiting for queue space, item was not queued");
        }
    }
}
