//! Public API for the producer
//!
//! External modules should import from here rather than directly from
//! internal modules. See module documentation for a usage example.

// Engine and factory
pub use crate::producer::engine::{ProducerState, RecordProducer};
pub use crate::producer::traits::{create_producer, Producer};

// Configuration
pub use crate::producer::config::{ProducerConfig, ProducerKind, ProducerSettings};

// Remote writer capability
pub use crate::producer::writer::{MemoryWriter, RemoteWriter, WriteAck};

// Error handling
pub use crate::producer::error::{
    ConfigError, ConfigResult, ProduceError, ProduceResult, WriteError, WriteResult,
};

// Statistics
pub use crate::producer::stats::ProducerStats;
