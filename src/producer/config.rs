//! Producer configuration and default resolution

use crate::producer::error::{ConfigError, ConfigResult};
use crate::producer::writer::RemoteWriter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Default prefix for producer log messages
pub const DEFAULT_LOG_PREFIX: &str = "stream-producer";

/// Default number of simultaneous write attempts
pub const DEFAULT_CONCURRENCY: usize = 3;

/// Default number of accepted-but-undispatched requests
pub const DEFAULT_BACKLOG: usize = 10;

/// Default dispatcher housekeeping interval
pub const DEFAULT_IDLE_TICK_MS: u64 = 5_000;

/// Default window granted to in-flight `produce` calls before the queue is sealed
pub const DEFAULT_STOP_GRACE_MS: u64 = 500;

/// Publishing strategy
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProducerKind {
    /// One remote write per record
    #[default]
    Record,
    /// Multi-record writes (not implemented)
    Batch,
}

/// Plain producer settings, loadable from a `[producer]` TOML table
///
/// Zero-valued numeric fields and an empty log prefix are replaced with
/// defaults by [`ProducerSettings::with_defaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProducerSettings {
    pub stream: String,
    pub concurrency: usize,
    pub backlog: usize,
    pub kind: ProducerKind,
    pub log_prefix: String,
    pub idle_tick_ms: u64,
    /// `None` selects the default; `Some(0)` disables the grace window
    pub stop_grace_ms: Option<u64>,
}

impl ProducerSettings {
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            ..Self::default()
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn backlog(mut self, backlog: usize) -> Self {
        self.backlog = backlog;
        self
    }

    pub fn kind(mut self, kind: ProducerKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn idle_tick(mut self, tick: Duration) -> Self {
        self.idle_tick_ms = tick.as_millis() as u64;
        self
    }

    pub fn stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace_ms = Some(grace.as_millis() as u64);
        self
    }

    /// Validate the settings and fill in defaults for unset fields
    pub fn with_defaults(mut self) -> ConfigResult<Self> {
        self.stream = self.stream.trim().to_string();
        if self.stream.is_empty() {
            return Err(ConfigError::MissingStream);
        }
        if self.concurrency == 0 {
            self.concurrency = DEFAULT_CONCURRENCY;
        }
        if self.concurrency > Semaphore::MAX_PERMITS || u32::try_from(self.concurrency).is_err() {
            return Err(ConfigError::InvalidSetting {
                field: "concurrency".to_string(),
                message: format!("concurrency {} is too large", self.concurrency),
            });
        }
        if self.backlog == 0 {
            self.backlog = DEFAULT_BACKLOG;
        }
        if self.backlog > Semaphore::MAX_PERMITS {
            return Err(ConfigError::InvalidSetting {
                field: "backlog".to_string(),
                message: format!("backlog {} is too large", self.backlog),
            });
        }
        if self.log_prefix.is_empty() {
            self.log_prefix = DEFAULT_LOG_PREFIX.to_string();
        }
        if self.idle_tick_ms == 0 {
            self.idle_tick_ms = DEFAULT_IDLE_TICK_MS;
        }
        if self.stop_grace_ms.is_none() {
            self.stop_grace_ms = Some(DEFAULT_STOP_GRACE_MS);
        }
        Ok(self)
    }

    pub fn idle_tick_duration(&self) -> Duration {
        Duration::from_millis(self.idle_tick_ms)
    }

    pub fn stop_grace_duration(&self) -> Duration {
        Duration::from_millis(self.stop_grace_ms.unwrap_or(DEFAULT_STOP_GRACE_MS))
    }
}

/// Settings plus the injected writer capability
#[derive(Clone)]
pub struct ProducerConfig {
    pub settings: ProducerSettings,
    pub writer: Arc<dyn RemoteWriter>,
}

impl ProducerConfig {
    pub fn new(settings: ProducerSettings, writer: Arc<dyn RemoteWriter>) -> Self {
        Self { settings, writer }
    }
}

impl fmt::Debug for ProducerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProducerConfig")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
