//! Remote writer capability
//!
//! The engine never talks to a stream service directly. Callers inject an
//! implementation of [`RemoteWriter`] and the engine invokes it once per
//! dispatched record. [`MemoryWriter`] is an in-process implementation that
//! keeps records in memory, used for dry runs and tests.

use crate::core::sync::handle_mutex_poison;
use crate::producer::error::{WriteError, WriteResult};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

/// Acknowledgement returned by the remote service for one appended record
///
/// Both identifiers are opaque to the engine and only ever logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    pub sequence_number: String,
    pub shard_id: String,
}

/// Capability for appending a single record to a remote stream
#[async_trait]
pub trait RemoteWriter: Send + Sync {
    /// Append `payload` to `stream`, routed by `partition_key`
    async fn write_record(
        &self,
        stream: &str,
        partition_key: &str,
        payload: &[u8],
    ) -> WriteResult<WriteAck>;

    /// Cheap liveness check run by the dispatcher on its idle tick
    ///
    /// The default implementation reports the writer as always healthy.
    async fn health_check(&self) -> WriteResult<()> {
        Ok(())
    }
}

/// A record held by [`MemoryWriter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub partition_key: String,
    pub payload: Vec<u8>,
    pub sequence_number: String,
    pub shard_id: String,
}

#[derive(Debug, Default)]
struct StreamLog {
    shards: usize,
    next_sequence: u64,
    records: Vec<StoredRecord>,
}

/// In-memory stream service
///
/// Streams must be registered with [`MemoryWriter::with_stream`] before use;
/// writes to an unknown stream fail with [`WriteError::ResourceNotFound`]
/// just like a real service would.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    streams: Mutex<HashMap<String, StreamLog>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a stream with the given shard count (0 is treated as 1)
    pub fn with_stream(mut self, stream: &str, shards: usize) -> Self {
        if let Ok(streams) = self.streams.get_mut() {
            streams.insert(
                stream.to_string(),
                StreamLog {
                    shards: shards.max(1),
                    ..StreamLog::default()
                },
            );
        }
        self
    }

    /// Snapshot of every record appended to `stream`, in append order
    pub fn records(&self, stream: &str) -> WriteResult<Vec<StoredRecord>> {
        let streams = handle_mutex_poison(self.streams.lock(), |message| WriteError::Internal {
            message,
        })?;
        streams
            .get(stream)
            .map(|log| log.records.clone())
            .ok_or(WriteError::ResourceNotFound)
    }

    pub fn record_count(&self, stream: &str) -> usize {
        self.records(stream).map(|r| r.len()).unwrap_or(0)
    }

    fn shard_for(partition_key: &str, shards: usize) -> usize {
        let mut hasher = DefaultHasher::new();
        partition_key.hash(&mut hasher);
        (hasher.finish() % shards as u64) as usize
    }
}

#[async_trait]
impl RemoteWriter for MemoryWriter {
    async fn write_record(
        &self,
        stream: &str,
        partition_key: &str,
        payload: &[u8],
    ) -> WriteResult<WriteAck> {
        let mut streams = handle_mutex_poison(self.streams.lock(), |message| {
            WriteError::Internal { message }
        })?;
        let log = streams.get_mut(stream).ok_or(WriteError::ResourceNotFound)?;

        log.next_sequence += 1;
        let ack = WriteAck {
            sequence_number: format!("{:020}", log.next_sequence),
            shard_id: format!(
                "shardId-{:012}",
                Self::shard_for(partition_key, log.shards)
            ),
        };
        log.records.push(StoredRecord {
            partition_key: partition_key.to_string(),
            payload: payload.to_vec(),
            sequence_number: ack.sequence_number.clone(),
            shard_id: ack.shard_id.clone(),
        });

        Ok(ack)
    }

    async fn health_check(&self) -> WriteResult<()> {
        handle_mutex_poison(self.streams.lock(), |message| WriteError::Internal {
            message,
        })
        .map(|_| ())
    }
}
