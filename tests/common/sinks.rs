//! Instrumented batch sinks

use async_trait::async_trait;
use microbatch_rs::{BatchSink, SinkError};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Semaphore;

/// Records batches, but each `process` call blocks until a permit is released.
///
/// Lets a test hold the assembler inside the sink while producers keep
/// submitting.
pub struct GatedSink {
    gate: Semaphore,
    batches: Mutex<Vec<Vec<i32>>>,
}

impl GatedSink {
    /// Create a closed gate
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Allow `n` more batches through
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// Let every future batch through
    pub fn open(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }

    pub fn batches(&self) -> Vec<Vec<i32>> {
        self.batches.lock().clone()
    }

    pub fn items(&self) -> Vec<i32> {
        self.batches.lock().iter().flatten().copied().collect()
    }
}

impl Default for GatedSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BatchSink<i32> for GatedSink {
    async fn process(&self, batch: &[i32]) -> Result<(), SinkError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| SinkError::new("gated", e.to_string()))?;
        permit.forget();

        self.batches.lock().push(batch.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

/// Fails every call until `failures` calls have been made, then records
pub struct FailingSink {
    failures: u32,
    calls: AtomicU32,
    batches: Mutex<Vec<Vec<i32>>>,
}

impl FailingSink {
    /// Fail the first `failures` calls
    pub fn new(failures: u32) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            batches: Mutex::new(Vec::new()),
        }
    }

    /// Never succeed
    pub fn always() -> Self {
        Self::new(u32::MAX)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> Vec<Vec<i32>> {
        self.batches.lock().clone()
    }
}

#[async_trait]
impl BatchSink<i32> for FailingSink {
    async fn process(&self, batch: &[i32]) -> Result<(), SinkError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(SinkError::new("failing", "downstream unavailable"));
        }
        self.batches.lock().push(batch.to_vec());
        Ok(())
    }

    fn name(&self) -> &str {
        "failing"
    }
}
