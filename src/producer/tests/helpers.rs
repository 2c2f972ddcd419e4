//! Instrumented writers shared by the producer test suites

use crate::producer::api::{
    ProducerConfig, ProducerSettings, RecordProducer, RemoteWriter, WriteAck, WriteError,
    WriteResult,
};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const STREAM: &str = "test-stream";

/// Settings with a short stop grace so tests stay fast
pub fn quick_settings() -> ProducerSettings {
    ProducerSettings::new(STREAM).stop_grace(Duration::from_millis(10))
}

pub fn build_producer(
    settings: ProducerSettings,
    writer: Arc<dyn RemoteWriter>,
) -> Arc<RecordProducer> {
    Arc::new(RecordProducer::new(ProducerConfig::new(settings, writer)).unwrap())
}

fn ack(sequence: usize) -> WriteAck {
    WriteAck {
        sequence_number: format!("{:020}", sequence),
        shard_id: "shardId-000000000000".to_string(),
    }
}

/// Succeeds for every call and remembers each (key, payload) pair
#[derive(Default)]
pub struct RecordingWriter {
    records: Mutex<Vec<(String, Vec<u8>)>>,
}

impl RecordingWriter {
    pub fn records(&self) -> Vec<(String, Vec<u8>)> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteWriter for RecordingWriter {
    async fn write_record(&self, stream: &str, key: &str, payload: &[u8]) -> WriteResult<WriteAck> {
        assert_eq!(stream, STREAM);
        let mut records = self.records.lock().unwrap();
        records.push((key.to_string(), payload.to_vec()));
        Ok(ack(records.len()))
    }
}

/// Fails every call with the configured error
pub struct FailingWriter {
    error: WriteError,
    calls: AtomicUsize,
}

impl FailingWriter {
    pub fn new(error: WriteError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteWriter for FailingWriter {
    async fn write_record(&self, _: &str, _: &str, _: &[u8]) -> WriteResult<WriteAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }
}

/// Tracks how many writes are running at the same time
pub struct ConcurrencyTracker {
    delay: Duration,
    current: AtomicUsize,
    peak: AtomicUsize,
    total: AtomicUsize,
}

impl ConcurrencyTracker {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            current: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            total: AtomicUsize::new(0),
        }
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteWriter for ConcurrencyTracker {
    async fn write_record(&self, _: &str, _: &str, _: &[u8]) -> WriteResult<WriteAck> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.current.fetch_sub(1, Ordering::SeqCst);
        Ok(ack(self.total.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Blocks every write until the test releases it
pub struct GatedWriter {
    gate: Semaphore,
    calls: AtomicUsize,
    completed: AtomicUsize,
}

impl GatedWriter {
    pub fn new() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    /// Let `writes` blocked (or future) writes complete
    pub fn release(&self, writes: usize) {
        self.gate.add_permits(writes);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteWriter for GatedWriter {
    async fn write_record(&self, _: &str, _: &str, _: &[u8]) -> WriteResult<WriteAck> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self.gate.acquire().await.map_err(|e| WriteError::Internal {
            message: e.to_string(),
        })?;
        permit.forget();
        Ok(ack(self.completed.fetch_add(1, Ordering::SeqCst) + 1))
    }
}

/// Fails keys starting with `fail-`, echoing the key in the error, after a
/// key-dependent delay so completions interleave
#[derive(Default)]
pub struct EchoWriter;

#[async_trait]
impl RemoteWriter for EchoWriter {
    async fn write_record(&self, _: &str, key: &str, payload: &[u8]) -> WriteResult<WriteAck> {
        let delay = (key.len() + payload.len()) % 7;
        tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        if key.starts_with("fail-") {
            Err(WriteError::Service {
                code: "Rejected".to_string(),
                message: key.to_string(),
            })
        } else {
            Ok(ack(delay))
        }
    }
}

/// Succeeds on writes but reports itself unhealthy on every tracker
#[derive(Default)]
pub struct UnhealthyWriter {
    checks: AtomicUsize,
}

impl UnhealthyWriter {
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteWriter for UnhealthyWriter {
    async fn write_record(&self, _: &str, _: &str, _: &[u8]) -> WriteResult<WriteAck> {
        Ok(ack(1))
    }

    async fn health_check(&self) -> WriteResult<()> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        Err(WriteError::Connection {
            message: "connection reset".to_string(),
        })
    }
}

/// Writes succeed at once, but a health check never completes
#[derive(Default)]
pub struct StalledHealthWriter {
    checks: AtomicUsize,
}

impl StalledHealthWriter {
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteWriter for StalledHealthWriter {
    async fn write_record(&self, _: &str, _: &str, _: &[u8]) -> WriteResult<WriteAck> {
        Ok(ack(1))
    }

    async fn health_check(&self) -> WriteResult<()> {
        self.checks.fetch_add(1, Ordering::SeqCst);
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Poll `condition` every few milliseconds for up to a second
pub async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    condition()
}
