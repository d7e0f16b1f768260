//! Error handling utilities
//!
//! This module provides the service error type and delivery retry helpers.

pub mod error;
pub mod recovery;

// Re-export commonly used types and functions
pub use error::*;
pub use recovery::{RetryConfig, RetryPolicy, Retried};
