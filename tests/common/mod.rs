//! Common test utilities for microbatch-rs
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::{fixtures, sinks::GatedSink};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let sink = Arc::new(GatedSink::new());
//!     let batcher = Batcher::<i32>::start(&fixtures::batching(8, 4, 10), &fixtures::no_retry(), sink.clone())?;
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod sinks;

// Re-export commonly used items
pub use assertions::BatchAssertions;
pub use sinks::{FailingSink, GatedSink};
