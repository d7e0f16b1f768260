//! Application state shared across HTTP handlers

use crate::batching::Batcher;
use crate::config::Config;
use crate::utils::current_timestamp;
use std::sync::Arc;

/// Item type accepted by the ingestion endpoint
pub type Item = i32;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker; all fields are behind `Arc` so every
/// worker submits to the same batcher.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// The single batcher all requests feed
    pub batcher: Arc<Batcher<Item>>,
    /// Unix timestamp of server start, in seconds
    pub started_at: u64,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, batcher: Batcher<Item>) -> Self {
        Self {
            config: Arc::new(config),
            batcher: Arc::new(batcher),
            started_at: current_timestamp(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> u64 {
        current_timestamp().saturating_sub(self.started_at)
    }
}
