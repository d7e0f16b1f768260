//! Configuration loading utilities
//!
//! Precedence is defaults, then the YAML file, then environment variables.

use super::Config;
use super::models::*;
use crate::utils::error::{Result, ServiceError};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

impl ServiceConfig {
    /// Load configuration from environment variables, starting from defaults
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Apply environment variables on top of this configuration
    pub fn with_env(self) -> Result<Self> {
        self.with_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup, starting from defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::default().with_lookup(lookup)
    }

    /// Override every field whose key is present in `lookup`.
    ///
    /// A present key always wins, even when it spells out the default value.
    pub fn with_lookup<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!("Applying configuration from environment variables");

        // Server configuration
        if let Some(host) = lookup("INGEST_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("INGEST_PORT") {
            self.server.port = parse_var("INGEST_PORT", &port)?;
        }
        if let Some(workers) = lookup("INGEST_WORKERS") {
            self.server.workers = Some(parse_var("INGEST_WORKERS", &workers)?);
        }

        // Batching configuration
        if let Some(capacity) = lookup("BATCH_QUEUE_CAPACITY") {
            self.batching.queue_capacity = parse_var("BATCH_QUEUE_CAPACITY", &capacity)?;
        }
        if let Some(size) = lookup("BATCH_MAX_SIZE") {
            self.batching.max_batch_size = parse_var("BATCH_MAX_SIZE", &size)?;
        }
        if let Some(linger) = lookup("BATCH_LINGER_MS") {
            self.batching.linger_ms = parse_var("BATCH_LINGER_MS", &linger)?;
        }
        if let Some(timeout) = lookup("BATCH_ENQUEUE_TIMEOUT_MS") {
            self.batching.enqueue_timeout_ms = match timeout.trim() {
                "" | "none" | "unbounded" => None,
                value => Some(parse_var("BATCH_ENQUEUE_TIMEOUT_MS", value)?),
            };
        }
        if let Some(policy) = lookup("BATCH_SHUTDOWN_POLICY") {
            self.batching.shutdown_policy = parse_var("BATCH_SHUTDOWN_POLICY", &policy)?;
        }

        // Delivery configuration
        if let Some(attempts) = lookup("DELIVERY_MAX_ATTEMPTS") {
            self.delivery.max_attempts = parse_var("DELIVERY_MAX_ATTEMPTS", &attempts)?;
        }

        // Logging configuration
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = parse_var("LOG_FORMAT", &format)?;
        }

        Ok(self)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ServiceError::Config(format!("Invalid {}: {}", key, e)))
}

/// Load configuration with precedence: defaults -> file -> env
pub async fn load_config(config_file: Option<&Path>) -> Result<Config> {
    load_config_with(config_file, |key| env::var(key).ok()).await
}

/// Like [`load_config`], reading overrides from `lookup` instead of the
/// process environment.
///
/// Only the fully layered result is validated, so a file may rely on an
/// override to become valid.
pub async fn load_config_with<F>(config_file: Option<&Path>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match config_file {
        Some(path) => Config::read_file(path).await?,
        None => {
            info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let config = Config {
        service: base.service.with_lookup(lookup)?,
    };
    config.validate()?;
    Ok(config)
}
