//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Service, server and logging validators
//! - `batching_validators`: Queue, assembler and delivery validators
//! - `tests`: Test suite for all validators

mod batching_validators;
mod config_validators;
mod trait_def;

pub use batching_validators::MAX_LINGER_MS;
pub use trait_def::Validate;
