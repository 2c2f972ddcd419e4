//! Stream Record Producer
//!
//! A client-side publisher that forwards application records, one at a time,
//! to a remote append-only stream service while bounding the number of writes
//! in flight.
//!
//! # Overview
//!
//! - **Bounded backlog**: `produce` waits for room instead of dropping records
//! - **Bounded concurrency**: at most `concurrency` writes run at once
//! - **Per-record results**: every `produce` call returns the outcome of its own write
//! - **Orderly shutdown**: `stop` resolves queued records and waits for in-flight writes
//! - **Injected writer**: the remote service is reached only through [`RemoteWriter`]
//!
//! Records are dequeued in FIFO order, but writes complete in any order.
//! Callers needing per-key ordering must serialize their own calls.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use streamprod::producer::{MemoryWriter, ProducerConfig, ProducerSettings, RecordProducer};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = Arc::new(MemoryWriter::new().with_stream("clicks", 2));
//! let producer = RecordProducer::new(ProducerConfig::new(
//!     ProducerSettings::new("clicks").concurrency(4),
//!     writer,
//! ))?;
//!
//! producer.start().await;
//! producer.produce("user-42", b"clicked").await?;
//! producer.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
mod config;
mod engine;
mod error;
mod request;
mod stats;
mod traits;
mod writer;

pub use config::{
    ProducerConfig, ProducerKind, ProducerSettings, DEFAULT_BACKLOG, DEFAULT_CONCURRENCY,
    DEFAULT_IDLE_TICK_MS, DEFAULT_LOG_PREFIX, DEFAULT_STOP_GRACE_MS,
};
pub use engine::{ProducerState, RecordProducer};
pub use error::{
    ConfigError, ConfigResult, ProduceError, ProduceResult, WriteError, WriteResult,
};
pub use stats::ProducerStats;
pub use traits::{create_producer, Producer};
pub use writer::{MemoryWriter, RemoteWriter, StoredRecord, WriteAck};
