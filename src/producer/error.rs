//! Producer Error Types

use crate::core::error_handling::ContextualError;

/// Errors raised while validating a producer configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("stream name not provided in configs")]
    MissingStream,

    #[error("producer type not implemented: {kind}")]
    NotImplemented { kind: String },

    #[error("invalid producer setting '{field}': {message}")]
    InvalidSetting { field: String, message: String },

    #[error("configuration file {path}: {message}")]
    File { path: String, message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true // every config problem is fixed by the caller
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::MissingStream => Some("stream name not provided in configs"),
            ConfigError::NotImplemented { .. } => Some("producer type not implemented"),
            ConfigError::InvalidSetting { message, .. } => Some(message),
            ConfigError::File { message, .. } => Some(message),
        }
    }
}

/// Failure reported by a [`RemoteWriter`](crate::producer::RemoteWriter)
///
/// The display text of each variant is surfaced verbatim to `produce` callers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("ResourceNotFound")]
    ResourceNotFound,

    #[error("Throttled")]
    Throttled,

    #[error("{message}")]
    Connection { message: String },

    #[error("{code}: {message}")]
    Service { code: String, message: String },

    #[error("{message}")]
    Internal { message: String },
}

/// Per-record error returned from `produce`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProduceError {
    #[error("producer not started yet. use start() first")]
    NotStarted,

    #[error("invalid publish request. empty msg or partition key")]
    InvalidRequest,

    #[error(transparent)]
    RemoteWrite(#[from] WriteError),

    #[error("producer stopped before the record was written")]
    Stopped,

    #[error("record was dropped before its write completed")]
    Abandoned,
}

impl ContextualError for ProduceError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, ProduceError::NotStarted | ProduceError::InvalidRequest)
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ProduceError::NotStarted => Some("producer not started yet"),
            ProduceError::InvalidRequest => Some("empty msg or partition key"),
            _ => None,
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
pub type ProduceResult<T> = Result<T, ProduceError>;
pub type WriteResult<T> = Result<T, WriteError>;
