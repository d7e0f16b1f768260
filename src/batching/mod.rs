//! Micro-batching pipeline
//!
//! Producers push single items into a bounded queue; one assembler task
//! groups them into batches bounded by size and by a linger window, and hands
//! each batch to a [`BatchSink`].

pub mod assembler;
pub mod batcher;
pub mod error;
pub mod queue;
pub mod sink;
pub mod stats;


pub use assembler::BatchAssembler;
pub use batcher::Batcher;
pub use error::BatchError;
pub use queue::{BoundedQueue, QueueError};
pub use sink::{BatchSink, LoggingSink, MemorySink, SinkError};
pub use stats::{BatcherStats, StatsSnapshot};
