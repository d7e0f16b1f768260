//! Retry utilities for batch delivery
//!
//! Sink failures never reach producers, so the assembler retries locally
//! with exponential backoff before giving a batch up.

use crate::config::DeliveryConfig;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub backoff_multiplier: f64,
    /// Whether to add jitter to delays
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

impl From<&DeliveryConfig> for RetryConfig {
    fn from(config: &DeliveryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            backoff_multiplier: config.backoff_multiplier,
            jitter: config.jitter,
        }
    }
}

/// Result of a retried call together with the number of attempts it took
#[derive(Debug)]
pub struct Retried<R, E> {
    pub result: std::result::Result<R, E>,
    pub attempts: u32,
}

/// Retry mechanism with exponential backoff
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Create a new retry policy
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Policy that makes exactly one attempt
    pub fn no_retry() -> Self {
        Self::new(RetryConfig {
            max_attempts: 1,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute a function with retry logic
    pub async fn call<F, Fut, R, E>(&self, mut f: F) -> Retried<R, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<R, E>>,
        E: std::fmt::Display,
    {
        let mut attempt = 0;
        let mut delay = self.config.base_delay;

        loop {
            attempt += 1;

            match f().await {
                Ok(result) => {
                    if attempt > 1 {
                        debug!(attempt, "Retry succeeded");
                    }
                    return Retried {
                        result: Ok(result),
                        attempts: attempt,
                    };
                }
                Err(error) => {
                    if attempt >= self.config.max_attempts {
                        return Retried {
                            result: Err(error),
                            attempts: attempt,
                        };
                    }

                    let actual_delay = self.jittered(delay);
                    warn!(
                        attempt,
                        error = %error,
                        "Attempt failed, retrying in {:?}", actual_delay
                    );

                    tokio::time::sleep(actual_delay).await;

                    delay = self.next_delay(delay);
                }
            }
        }
    }

    /// Delay with +/-5% jitter applied when enabled
    fn jittered(&self, delay: Duration) -> Duration {
        if !self.config.jitter {
            return delay;
        }
        let jitter_factor = 0.1;
        let jitter = delay.as_millis() as f64 * jitter_factor * (rand::random::<f64>() - 0.5);
        Duration::from_millis((delay.as_millis() as f64 + jitter).max(0.0) as u64)
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        std::cmp::min(
            Duration::from_millis((delay.as_millis() as f64 * self.config.backoff_multiplier) as u64),
            self.config.max_delay,
        )
    }
}
