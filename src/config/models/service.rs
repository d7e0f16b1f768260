//! Top-level service configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Top-level service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ServiceConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Queue and assembler configuration
    #[serde(default)]
    pub batching: BatchingConfig,
    /// Sink delivery configuration
    #[serde(default)]
    pub delivery: DeliveryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
