//! Core configuration validators
//!
//! Validation for the top-level service configuration, the HTTP server and
//! logging sections.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for ServiceConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating service configuration");

        self.server
            .validate()
            .map_err(|e| format!("server: {}", e))?;
        self.batching
            .validate()
            .map_err(|e| format!("batching: {}", e))?;
        self.delivery
            .validate()
            .map_err(|e| format!("delivery: {}", e))?;
        self.logging
            .validate()
            .map_err(|e| format!("logging: {}", e))?;

        debug!("Service configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }
        Ok(())
    }
}
