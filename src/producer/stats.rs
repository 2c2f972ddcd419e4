//! Producer counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of a producer's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Requests accepted onto the backlog
    pub submitted: u64,
    /// Records the remote writer acknowledged
    pub written: u64,
    /// Records the remote writer rejected
    pub failed: u64,
    /// Requests resolved with `Stopped` while draining the backlog
    pub drained: u64,
    /// Failed writer health checks on the idle tick
    pub unhealthy_ticks: u64,
}

impl ProducerStats {
    /// Requests accepted but not yet resolved
    pub fn outstanding(&self) -> u64 {
        self.submitted
            .saturating_sub(self.written + self.failed + self.drained)
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    submitted: AtomicU64,
    written: AtomicU64,
    failed: AtomicU64,
    drained: AtomicU64,
    unhealthy_ticks: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_submitted(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drained(&self) {
        self.drained.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_unhealthy_tick(&self) {
        self.unhealthy_ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> ProducerStats {
        ProducerStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            unhealthy_ticks: self.unhealthy_ticks.load(Ordering::Relaxed),
        }
    }
}
