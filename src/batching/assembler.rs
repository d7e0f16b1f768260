//! Linger + max-size batch assembly
//!
//! A single assembler task turns the queue into batches:
//!
//! 1. wait for one item (the only place the task idles),
//! 2. sleep for the linger window so concurrent producers can catch up,
//! 3. take whatever else is already queued, up to `max_batch_size - 1`,
//! 4. hand the batch to the sink and start over.
//!
//! The drain happens exactly once per batch, so items trickling in more than
//! one linger apart are delivered one by one, while a burst larger than the
//! batch size is split into full batches.

use super::queue::BoundedQueue;
use super::sink::BatchSink;
use super::stats::BatcherStats;
use crate::config::{BatchingConfig, ShutdownPolicy};
use crate::utils::error::RetryPolicy;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Background worker that owns the in-progress batch
pub struct BatchAssembler<T> {
    queue: Arc<BoundedQueue<T>>,
    sink: Arc<dyn BatchSink<T>>,
    max_batch_size: usize,
    linger: Duration,
    shutdown_policy: ShutdownPolicy,
    retry: RetryPolicy,
    stats: Arc<BatcherStats>,
    cancel: CancellationToken,
}

impl<T> BatchAssembler<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(
        queue: Arc<BoundedQueue<T>>,
        sink: Arc<dyn BatchSink<T>>,
        config: &BatchingConfig,
        retry: RetryPolicy,
        stats: Arc<BatcherStats>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            queue,
            sink,
            max_batch_size: config.max_batch_size.max(1),
            linger: config.linger(),
            shutdown_policy: config.shutdown_policy,
            retry,
            stats,
            cancel,
        }
    }

    /// Assemble and deliver batches until cancelled or the queue is closed
    /// and empty, then apply the shutdown policy.
    pub async fn run(self) {
        info!(
            sink = self.sink.name(),
            max_batch_size = self.max_batch_size,
            linger_ms = self.linger.as_millis() as u64,
            "Batch assembler started"
        );

        let mut batch: Vec<T> = Vec::with_capacity(self.max_batch_size);

        loop {
            let first = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                item = self.queue.take_one() => item,
            };
            let Some(first) = first else {
                debug!("Queue closed and drained");
                break;
            };
            batch.push(first);

            if !self.linger().await {
                break;
            }

            let room = self.max_batch_size - batch.len();
            batch.extend(self.queue.drain_up_to(room));

            self.deliver(&batch).await;
            batch.clear();
        }

        self.finish(batch).await;
    }

    /// Sleep for the linger window. Returns `false` if cancelled meanwhile.
    async fn linger(&self) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(self.linger) => true,
        }
    }

    async fn deliver(&self, batch: &[T]) {
        let size = batch.len();
        let sink = &self.sink;

        let retried = self.retry.call(|| sink.process(batch)).await;

        match retried.result {
            Ok(()) => {
                self.stats.record_delivered(size, retried.attempts);
                debug!(size, attempts = retried.attempts, "Batch delivered");
            }
            Err(e) => {
                self.stats.record_failed(size, retried.attempts);
                error!(
                    sink = sink.name(),
                    size,
                    attempts = retried.attempts,
                    error = %e,
                    "Dropping batch after failed delivery"
                );
            }
        }
    }

    async fn finish(&self, mut batch: Vec<T>) {
        // Nothing may enter the queue once we decide what to do with it
        self.queue.close();

        match self.shutdown_policy {
            ShutdownPolicy::Flush => {
                let room = self.max_batch_size - batch.len();
                batch.extend(self.queue.drain_up_to(room));

                let mut flushed = 0;
                while !batch.is_empty() {
                    flushed += batch.len();
                    self.deliver(&batch).await;
                    batch.clear();
                    batch.extend(self.queue.drain_up_to(self.max_batch_size));
                }
                info!(flushed, "Batch assembler stopped");
            }
            ShutdownPolicy::Discard => {
                let dropped = batch.len() + self.queue.drain_up_to(usize::MAX).len();
                if dropped > 0 {
                    self.stats.record_dropped(dropped);
                    warn!(dropped, "Discarded undelivered items on shutdown");
                }
                info!("Batch assembler stopped");
            }
        }
    }
}
