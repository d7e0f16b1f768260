//! Batcher counters

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by producers and the assembler
#[derive(Debug, Default)]
pub struct BatcherStats {
    accepted: AtomicU64,
    rejected_full: AtomicU64,
    rejected_shutdown: AtomicU64,
    cancelled: AtomicU64,
    batches_delivered: AtomicU64,
    items_delivered: AtomicU64,
    delivery_failures: AtomicU64,
    delivery_retries: AtomicU64,
    items_dropped: AtomicU64,
}

impl BatcherStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_full(&self) {
        self.rejected_full.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected_shutdown(&self) {
        self.rejected_shutdown.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self, items: usize, attempts: u32) {
        self.batches_delivered.fetch_add(1, Ordering::Relaxed);
        self.items_delivered.fetch_add(items as u64, Ordering::Relaxed);
        self.record_retries(attempts);
    }

    pub(crate) fn record_failed(&self, items: usize, attempts: u32) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
        self.items_dropped.fetch_add(items as u64, Ordering::Relaxed);
        self.record_retries(attempts);
    }

    pub(crate) fn record_dropped(&self, items: usize) {
        self.items_dropped.fetch_add(items as u64, Ordering::Relaxed);
    }

    fn record_retries(&self, attempts: u32) {
        let retries = u64::from(attempts.saturating_sub(1));
        if retries > 0 {
            self.delivery_retries.fetch_add(retries, Ordering::Relaxed);
        }
    }

    /// Point-in-time copy of the counters
    pub fn snapshot(&self, queue_depth: usize, queue_capacity: usize) -> StatsSnapshot {
        StatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            rejected_full: self.rejected_full.load(Ordering::Relaxed),
            rejected_shutdown: self.rejected_shutdown.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            batches_delivered: self.batches_delivered.load(Ordering::Relaxed),
            items_delivered: self.items_delivered.load(Ordering::Relaxed),
            delivery_failures: self.delivery_failures.load(Ordering::Relaxed),
            delivery_retries: self.delivery_retries.load(Ordering::Relaxed),
            items_dropped: self.items_dropped.load(Ordering::Relaxed),
            queue_depth,
            queue_capacity,
        }
    }
}

/// Serializable view of [`BatcherStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Items queued successfully
    pub accepted: u64,
    /// Submits rejected because the queue stayed full
    pub rejected_full: u64,
    /// Submits rejected because the batcher was stopping
    pub rejected_shutdown: u64,
    /// Submits abandoned by the caller while waiting for space
    pub cancelled: u64,
    pub batches_delivered: u64,
    pub items_delivered: u64,
    /// Batches given up after the last delivery attempt
    pub delivery_failures: u64,
    pub delivery_retries: u64,
    /// Items lost to delivery failures or a discarding shutdown
    pub items_dropped: u64,
    pub queue_depth: usize,
    pub queue_capacity: usize,
}
