//! Batching pipeline configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What happens to undelivered items when the batcher stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShutdownPolicy {
    /// Deliver the in-flight batch and everything still queued
    #[default]
    Flush,
    /// Drop the in-flight batch and the queue contents
    Discard,
}

impl std::str::FromStr for ShutdownPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flush" => Ok(Self::Flush),
            "discard" => Ok(Self::Discard),
            other => Err(format!("unknown shutdown policy '{}'", other)),
        }
    }
}

/// Queue and assembler settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Maximum number of buffered, not yet batched items
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Upper bound on items per delivered batch
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Coalescing delay after the first item of a batch, in milliseconds
    #[serde(default = "default_linger_ms")]
    pub linger_ms: u64,
    /// How long a producer may wait for queue space; `null` waits forever
    #[serde(default = "default_enqueue_timeout_ms")]
    pub enqueue_timeout_ms: Option<u64>,
    /// Handling of undelivered items on shutdown
    #[serde(default)]
    pub shutdown_policy: ShutdownPolicy,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            max_batch_size: default_max_batch_size(),
            linger_ms: default_linger_ms(),
            enqueue_timeout_ms: default_enqueue_timeout_ms(),
            shutdown_policy: ShutdownPolicy::default(),
        }
    }
}

impl BatchingConfig {
    pub fn linger(&self) -> Duration {
        Duration::from_millis(self.linger_ms)
    }

    pub fn enqueue_timeout(&self) -> Option<Duration> {
        self.enqueue_timeout_ms.map(Duration::from_millis)
    }
}
