//! Utility modules for the ingestion service
//!
//! - **error**: service error type, HTTP error mapping and retry helpers
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{Result, RetryConfig, RetryPolicy, ServiceError};
pub use logging::init_tracing;

use std::time::{SystemTime, UNIX_EPOCH};

/// Get current timestamp in seconds
pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
