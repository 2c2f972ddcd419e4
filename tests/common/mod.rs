//! Common test utilities and helpers

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use streamprod::producer::{
    MemoryWriter, ProducerConfig, ProducerSettings, RecordProducer, RemoteWriter, WriteAck,
    WriteResult,
};

pub const STREAM: &str = "integration-stream";

/// Settings with a short stop grace so tests finish quickly
pub fn settings() -> ProducerSettings {
    ProducerSettings::new(STREAM).stop_grace(Duration::from_millis(10))
}

pub fn memory_producer(
    settings: ProducerSettings,
    shards: usize,
) -> (Arc<RecordProducer>, Arc<MemoryWriter>) {
    let writer = Arc::new(MemoryWriter::new().with_stream(STREAM, shards));
    let producer = RecordProducer::new(ProducerConfig::new(settings, writer.clone()))
        .expect("valid test settings");
    (Arc::new(producer), writer)
}

/// Writer that delays each write and tracks the peak number in flight
pub struct SlowWriter {
    inner: MemoryWriter,
    delay: Duration,
    active: AtomicUsize,
    pub peak: AtomicUsize,
}

impl SlowWriter {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryWriter::new().with_stream(STREAM, 1),
            delay,
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn stored(&self) -> usize {
        self.inner.record_count(STREAM)
    }
}

#[async_trait]
impl RemoteWriter for SlowWriter {
    async fn write_record(
        &self,
        stream: &str,
        partition_key: &str,
        payload: &[u8],
    ) -> WriteResult<WriteAck> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        let result = self.inner.write_record(stream, partition_key, payload).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
