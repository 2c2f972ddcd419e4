//! Record producer engine
//!
//! A [`RecordProducer`] accepts records from any number of callers, holds them
//! in a bounded backlog, and writes them through the injected
//! [`RemoteWriter`] with at most `concurrency` writes in flight. Each caller
//! awaits the outcome of its own record.
//!
//! ```text
//!  produce() ──► backlog (mpsc, cap = backlog) ──► dispatcher ──► permit ──► write task
//!      ▲                                                                         │
//!      └──────────────────────── oneshot completion ◄───────────────────────────┘
//! ```

use crate::producer::config::{ProducerConfig, ProducerKind, ProducerSettings};
use crate::producer::error::{ConfigError, ConfigResult, ProduceError, ProduceResult};
use crate::producer::request::ProduceRequest;
use crate::producer::stats::{ProducerStats, StatsCounters};
use crate::producer::writer::RemoteWriter;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::{broadcast, mpsc, Mutex, OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Lifecycle state of a producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
pub enum ProducerState {
    Stopped = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl From<u8> for ProducerState {
    fn from(value: u8) -> Self {
        match value {
            1 => ProducerState::Starting,
            2 => ProducerState::Running,
            3 => ProducerState::Stopping,
            _ => ProducerState::Stopped,
        }
    }
}

/// State shared between the producer handle, its dispatcher and write tasks
struct Shared {
    settings: ProducerSettings,
    writer: Arc<dyn RemoteWriter>,
    slots: Arc<Semaphore>,
    stats: StatsCounters,
}

/// Handles for a running dispatcher
struct Dispatch {
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<mpsc::Receiver<ProduceRequest>>,
}

/// Bounded-concurrency single-record producer
pub struct RecordProducer {
    shared: Arc<Shared>,
    state: AtomicU8,
    // Serializes start/stop transitions
    lifecycle: Mutex<Option<Dispatch>>,
    queue: RwLock<Option<mpsc::Sender<ProduceRequest>>>,
}

impl RecordProducer {
    /// Validate `config` and build a stopped producer
    pub fn new(config: ProducerConfig) -> ConfigResult<Self> {
        let settings = config.settings.with_defaults()?;
        if settings.kind != ProducerKind::Record {
            return Err(ConfigError::NotImplemented {
                kind: settings.kind.to_string(),
            });
        }

        let slots = Arc::new(Semaphore::new(settings.concurrency));
        Ok(Self {
            shared: Arc::new(Shared {
                settings,
                writer: config.writer,
                slots,
                stats: StatsCounters::default(),
            }),
            state: AtomicU8::new(ProducerState::Stopped as u8),
            lifecycle: Mutex::new(None),
            queue: RwLock::new(None),
        })
    }

    pub fn settings(&self) -> &ProducerSettings {
        &self.shared.settings
    }

    pub fn state(&self) -> ProducerState {
        ProducerState::from(self.state.load(Ordering::Acquire))
    }

    pub fn is_running(&self) -> bool {
        self.state() == ProducerState::Running
    }

    /// Number of requests waiting in the backlog
    pub fn queued(&self) -> usize {
        self.sender()
            .map(|sender| sender.max_capacity() - sender.capacity())
            .unwrap_or(0)
    }

    /// Number of write attempts currently holding a concurrency slot
    pub fn in_flight(&self) -> usize {
        self.shared.settings.concurrency - self.shared.slots.available_permits()
    }

    pub fn stats(&self) -> ProducerStats {
        self.shared.stats.snapshot()
    }

    /// Start the dispatcher
    ///
    /// Does nothing if the producer is already running. Must be called from
    /// within a tokio runtime.
    pub async fn start(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        if self.state() != ProducerState::Stopped {
            return;
        }
        self.set_state(ProducerState::Starting);

        let settings = &self.shared.settings;
        log::debug!(
            "[{}] starting producer for stream: {}",
            settings.log_prefix,
            settings.stream
        );

        let (request_tx, request_rx) = mpsc::channel(settings.backlog);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(dispatch(self.shared.clone(), request_rx, shutdown_rx));

        self.set_sender(Some(request_tx));
        *lifecycle = Some(Dispatch {
            shutdown_tx,
            handle,
        });
        self.set_state(ProducerState::Running);
    }

    /// Publish a single record and wait for the remote write to complete
    pub async fn produce(&self, partition_key: &str, payload: &[u8]) -> ProduceResult<()> {
        if !self.is_running() {
            return Err(ProduceError::NotStarted);
        }
        if partition_key.is_empty() || payload.is_empty() {
            return Err(ProduceError::InvalidRequest);
        }
        let sender = self.sender().ok_or(ProduceError::NotStarted)?;

        let (request, completion) =
            ProduceRequest::new(partition_key.to_string(), payload.to_vec());
        if sender.send(request).await.is_err() {
            // Backlog sealed by stop() before the request was accepted
            return Err(ProduceError::Stopped);
        }
        drop(sender);
        self.shared.stats.record_submitted();

        completion.await.unwrap_or(Err(ProduceError::Abandoned))
    }

    /// Stop the producer
    ///
    /// Late `produce` calls fail with `NotStarted`, requests still in the
    /// backlog are resolved with `Stopped`, and in-flight writes are awaited.
    /// Returns once no task belonging to this producer is left. Does nothing
    /// if the producer is not running.
    pub async fn stop(&self) {
        let mut lifecycle = self.lifecycle.lock().await;
        let Some(dispatch) = lifecycle.take() else {
            return;
        };

        let settings = &self.shared.settings;
        log::debug!("[{}] stopping producer", settings.log_prefix);

        self.set_state(ProducerState::Stopping);
        self.set_sender(None);
        let _ = dispatch.shutdown_tx.send(());

        let grace = settings.stop_grace_duration();
        if !grace.is_zero() {
            tokio::time::sleep(grace).await;
        }

        match dispatch.handle.await {
            Ok(mut requests) => {
                requests.close();
                let mut drained = 0usize;
                while let Some(request) = requests.recv().await {
                    request.reject(ProduceError::Stopped);
                    self.shared.stats.record_drained();
                    drained += 1;
                }
                if drained > 0 {
                    log::warn!(
                        "[{}] {} queued records were not written before stop",
                        settings.log_prefix,
                        drained
                    );
                }
            }
            Err(e) => {
                log::error!("[{}] dispatcher task failed: {}", settings.log_prefix, e);
            }
        }

        // Every slot back in the semaphore means no write is still running
        match self
            .shared
            .slots
            .acquire_many(settings.concurrency as u32)
            .await
        {
            Ok(all_slots) => drop(all_slots),
            Err(e) => log::error!("[{}] concurrency limiter closed: {}", settings.log_prefix, e),
        }

        self.set_state(ProducerState::Stopped);
        let stats = self.stats();
        log::info!(
            "[{}] producer stopped: {} written, {} failed, {} drained",
            settings.log_prefix,
            stats.written,
            stats.failed,
            stats.drained
        );
    }

    fn set_state(&self, state: ProducerState) {
        self.state.store(state as u8, Ordering::Release);
    }

    // The guarded Option is only ever replaced whole, so a poisoned lock
    // still holds a consistent value
    fn sender(&self) -> Option<mpsc::Sender<ProduceRequest>> {
        self.queue
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_sender(&self, sender: Option<mpsc::Sender<ProduceRequest>>) {
        *self.queue.write().unwrap_or_else(PoisonError::into_inner) = sender;
    }
}

/// Dispatcher loop: moves requests from the backlog into write tasks
///
/// Hands the backlog receiver back on exit so the stopper can drain it.
async fn dispatch(
    shared: Arc<Shared>,
    mut requests: mpsc::Receiver<ProduceRequest>,
    mut shutdown: broadcast::Receiver<()>,
) -> mpsc::Receiver<ProduceRequest> {
    let prefix = shared.settings.log_prefix.clone();
    let tick = shared.settings.idle_tick_duration();
    let mut ticker = interval_at(Instant::now() + tick, tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut pending_check: Option<JoinHandle<()>> = None;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.recv() => {
                log::debug!("[{}] received done signal. stopping dispatcher", prefix);
                break;
            }

            request = requests.recv() => {
                let Some(request) = request else {
                    log::info!("[{}] request queue closed. exiting", prefix);
                    break;
                };
                log::trace!(
                    "[{}] received request for partition key: {}",
                    prefix,
                    request.partition_key
                );

                // Blocks while all slots are taken
                match shared.slots.clone().acquire_owned().await {
                    Ok(permit) => {
                        tokio::spawn(write_record(shared.clone(), request, permit));
                    }
                    Err(_) => {
                        request.reject(ProduceError::Stopped);
                        break;
                    }
                }
            }

            _ = ticker.tick() => {
                if matches!(&pending_check, Some(check) if !check.is_finished()) {
                    log::trace!("[{}] health check still running, skipping tick", prefix);
                } else {
                    pending_check = Some(tokio::spawn(check_writer_health(shared.clone())));
                }
            }
        }
    }

    if let Some(check) = pending_check {
        check.abort();
        let _ = check.await;
    }

    requests
}

/// One write attempt; the permit is released when the task ends
async fn write_record(
    shared: Arc<Shared>,
    request: ProduceRequest,
    permit: OwnedSemaphorePermit,
) {
    let settings = &shared.settings;
    let result = shared
        .writer
        .write_record(&settings.stream, &request.partition_key, &request.payload)
        .await;

    match result {
        Ok(ack) => {
            log::debug!(
                "[{}] record written successfully. sequence id {}, shard id {}",
                settings.log_prefix,
                ack.sequence_number,
                ack.shard_id
            );
            shared.stats.record_written();
            request.finish(Ok(()));
        }
        Err(error) => {
            log::warn!(
                "[{}] error writing record with partition key {}: {}",
                settings.log_prefix,
                request.partition_key,
                error
            );
            shared.stats.record_failed();
            request.reject(error.into());
        }
    }

    // Slot goes back last, once this task no longer touches engine state
    drop(shared);
    drop(permit);
}

async fn check_writer_health(shared: Arc<Shared>) {
    if let Err(error) = shared.writer.health_check().await {
        shared.stats.record_unhealthy_tick();
        log::warn!(
            "[{}] writer health check failed: {}",
            shared.settings.log_prefix,
            error
        );
    }
}
