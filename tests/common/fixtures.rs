//! Configuration fixtures
//!
//! All fixtures produce configurations that pass validation unless the
//! name says otherwise.

use microbatch_rs::{BatchingConfig, Config, DeliveryConfig, ShutdownPolicy};

/// Batching config with an unbounded producer wait and flush on shutdown
pub fn batching(queue_capacity: usize, max_batch_size: usize, linger_ms: u64) -> BatchingConfig {
    BatchingConfig {
        queue_capacity,
        max_batch_size,
        linger_ms,
        enqueue_timeout_ms: None,
        shutdown_policy: ShutdownPolicy::Flush,
    }
}

/// Same as [`batching`] with a bounded producer wait
pub fn batching_with_timeout(
    queue_capacity: usize,
    max_batch_size: usize,
    linger_ms: u64,
    enqueue_timeout_ms: u64,
) -> BatchingConfig {
    BatchingConfig {
        enqueue_timeout_ms: Some(enqueue_timeout_ms),
        ..batching(queue_capacity, max_batch_size, linger_ms)
    }
}

/// A single delivery attempt per batch
pub fn no_retry() -> DeliveryConfig {
    DeliveryConfig {
        max_attempts: 1,
        ..Default::default()
    }
}

/// Deterministic retries with a short fixed base delay
pub fn retries(max_attempts: u32) -> DeliveryConfig {
    DeliveryConfig {
        max_attempts,
        base_delay_ms: 5,
        max_delay_ms: 50,
        backoff_multiplier: 2.0,
        jitter: false,
    }
}

/// Service config around the given batching settings
pub fn service_config(batching: BatchingConfig) -> Config {
    let mut config = Config::default();
    config.service.batching = batching;
    config.service.delivery = no_retry();
    config
}
