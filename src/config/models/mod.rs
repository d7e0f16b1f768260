//! Configuration data models
//!
//! This module defines all configuration structures used throughout the service.

#![allow(missing_docs)]

pub mod batching;
pub mod delivery;
pub mod logging;
pub mod server;
pub mod service;

// Re-export all configuration types
pub use batching::*;
pub use delivery::*;
pub use logging::*;
pub use server::*;
pub use service::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    64 * 1024 // 64KB
}

/// Default graceful shutdown timeout in seconds
pub fn default_shutdown_timeout() -> u64 {
    30
}

pub fn default_queue_capacity() -> usize {
    10_000
}

pub fn default_max_batch_size() -> usize {
    1_000
}

pub fn default_linger_ms() -> u64 {
    25
}

pub fn default_enqueue_timeout_ms() -> Option<u64> {
    Some(1_000)
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_base_delay() -> u64 {
    50
}

pub fn default_max_delay() -> u64 {
    2_000
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_log_level() -> String {
    "info".to_string()
}
