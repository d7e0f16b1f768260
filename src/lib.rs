//! # microbatch-rs
//!
//! An HTTP ingestion service that groups single events into micro-batches.
//!
//! ## Features
//!
//! - **Linger + max-size batching**: the first item of a batch opens a short
//!   linger window; everything queued by then (up to the batch size) ships
//!   together
//! - **Backpressure**: a bounded queue with a bounded producer wait, surfaced
//!   to HTTP clients as `429 Too Many Requests`
//! - **Graceful shutdown**: in-flight and queued items are flushed or
//!   discarded according to configuration
//! - **Pluggable sinks**: any [`BatchSink`] implementation receives batches
//!
//! ## Library use
//!
//! ```rust,no_run
//! use microbatch_rs::{BatchingConfig, Batcher, DeliveryConfig, LoggingSink};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let batcher = Batcher::<i32>::start(
//!         &BatchingConfig::default(),
//!         &DeliveryConfig::default(),
//!         Arc::new(LoggingSink::new()),
//!     )?;
//!
//!     for n in 0..100 {
//!         batcher.submit(n).await?;
//!     }
//!     batcher.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Service mode
//!
//! ```rust,no_run
//! use microbatch_rs::{load_config, run_server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(None).await?;
//!     run_server(config).await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod batching;
pub mod config;
pub mod server;
pub mod utils;

// Re-export main types
pub use batching::{
    BatchError, BatchSink, Batcher, BoundedQueue, LoggingSink, MemorySink, QueueError, SinkError,
    StatsSnapshot,
};
pub use config::{
    BatchingConfig, Config, DeliveryConfig, LogFormat, LoggingConfig, ServerConfig,
    ShutdownPolicy, load_config,
};
pub use server::{HttpServer, ServerBuilder, run_server};
pub use utils::error::{Result, ServiceError};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Service build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build timestamp (seconds since the epoch)
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build information recorded by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
