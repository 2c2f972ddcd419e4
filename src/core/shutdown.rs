//! Shutdown coordination for the command-line producer
//!
//! Turns SIGINT/SIGTERM (or Ctrl-C on other platforms) into a broadcast that
//! producing loops can select on. A second signal exits immediately.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Exit code used when a second signal forces termination
pub const FORCED_EXIT_CODE: i32 = 130;

/// Coordinates graceful shutdown across the application
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: broadcast::Sender<()>,
    requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(4);
        Self {
            shutdown_tx,
            requested: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    pub fn trigger_shutdown(&self) {
        self.requested.store(true, Ordering::Release);
        let _ = self.shutdown_tx.send(());
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Resolve once shutdown has been requested, even if it already was
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        if self.is_shutdown_requested() {
            return;
        }
        let _ = rx.recv().await;
    }

    /// Spawn the signal listeners; requires a running tokio runtime
    pub fn install_signal_handlers(&self) {
        let signal_count = Arc::new(AtomicUsize::new(0));

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            for kind in [SignalKind::interrupt(), SignalKind::terminate()] {
                let coordinator = self.clone();
                let count = signal_count.clone();
                tokio::spawn(async move {
                    let Ok(mut stream) = signal(kind) else {
                        log::warn!("could not install handler for signal {:?}", kind);
                        return;
                    };
                    while stream.recv().await.is_some() {
                        coordinator.on_signal(&count);
                    }
                });
            }
        }

        #[cfg(not(unix))]
        {
            let coordinator = self.clone();
            tokio::spawn(async move {
                while tokio::signal::ctrl_c().await.is_ok() {
                    coordinator.on_signal(&signal_count);
                }
            });
        }
    }

    fn on_signal(&self, count: &AtomicUsize) {
        if count.fetch_add(1, Ordering::AcqRel) >= 1 {
            log::warn!("second signal received; exiting");
            std::process::exit(FORCED_EXIT_CODE);
        }
        log::info!("signal received; finishing in-flight records");
        self.trigger_shutdown();
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}
