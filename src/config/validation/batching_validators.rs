//! Batching pipeline validators

use super::trait_def::Validate;
use crate::config::models::*;

/// Longest accepted linger window
pub const MAX_LINGER_MS: u64 = 60_000;

impl Validate for BatchingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.queue_capacity == 0 {
            return Err("Queue capacity must be greater than 0".to_string());
        }

        if self.max_batch_size == 0 {
            return Err("Max batch size must be greater than 0".to_string());
        }

        // Operational limit: keep batches no larger than the queue can buffer
        if self.max_batch_size > self.queue_capacity {
            return Err(format!(
                "Max batch size ({}) cannot exceed queue capacity ({})",
                self.max_batch_size, self.queue_capacity
            ));
        }

        if self.linger_ms > MAX_LINGER_MS {
            return Err(format!(
                "Linger of {}ms exceeds the {}ms limit",
                self.linger_ms, MAX_LINGER_MS
            ));
        }

        Ok(())
    }
}

impl Validate for DeliveryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_attempts == 0 {
            return Err("Max delivery attempts must be at least 1".to_string());
        }

        if self.base_delay_ms > self.max_delay_ms {
            return Err(format!(
                "Base delay ({}ms) cannot exceed max delay ({}ms)",
                self.base_delay_ms, self.max_delay_ms
            ));
        }

        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier < 1.0 {
            return Err("Backoff multiplier must be a finite value >= 1.0".to_string());
        }

        Ok(())
    }
}
