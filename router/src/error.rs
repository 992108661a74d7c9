//! Router error types
//!
//! Every failure the router can surface carries a machine-readable
//! [`ErrorKind`] plus the offending name (adapter, task type or config field)
//! so callers can branch on it without parsing the message.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by an adapter's `process` call.
pub type ProcessError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for router operations
pub type RouterResult<T> = Result<T, RouterError>;

/// Errors that can occur while configuring the router or routing a task
#[derive(Error, Debug)]
pub enum RouterError {
    /// `route()` was called before `initialize()`
    #[error("Router must be initialized before routing")]
    NotInitialized,

    /// Static or runtime configuration failed validation
    #[error("Invalid configuration for `{field}`: {message}")]
    Configuration { field: String, message: String },

    /// Registration rejected before any task could reach the adapter
    #[error("Invalid adapter `{name}`: {reason}")]
    InvalidAdapter { name: String, reason: String },

    /// Operation referenced an adapter that was never registered
    #[error("Unknown adapter `{name}`")]
    UnknownAdapter { name: String },

    /// Candidate derivation plus the active filter left nothing to pick
    #[error("No suitable adapter available for task type `{task_type}` (candidates: {candidates:?})")]
    NoAvailableAdapter {
        task_type: String,
        candidates: Vec<String>,
    },

    /// The selected adapter's `process` call failed
    #[error("Adapter {adapter} failed after {latency_ms:.2}ms: {source}")]
    AdapterDispatch {
        adapter: String,
        latency_ms: f64,
        #[source]
        source: ProcessError,
    },

    /// Task descriptor could not be parsed or normalized
    #[error("Invalid task: {message}")]
    InvalidTask { message: String },

    /// Deadline elapsed before the adapter returned
    #[error("Adapter {adapter} did not respond within {timeout_ms}ms")]
    Timeout { adapter: String, timeout_ms: u64 },
}

/// Machine-readable classification of a [`RouterError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NotInitialized,
    Configuration,
    InvalidAdapter,
    UnknownAdapter,
    NoAvailableAdapter,
    AdapterDispatch,
    InvalidTask,
    Timeout,
}

impl ErrorKind {
    /// Stable error code, suitable for logs and metrics labels
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::Configuration => "CONFIGURATION",
            Self::InvalidAdapter => "INVALID_ADAPTER",
            Self::UnknownAdapter => "UNKNOWN_ADAPTER",
            Self::NoAvailableAdapter => "NO_AVAILABLE_ADAPTER",
            Self::AdapterDispatch => "ADAPTER_DISPATCH",
            Self::InvalidTask => "INVALID_TASK",
            Self::Timeout => "TIMEOUT",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl RouterError {
    pub(crate) fn config(field: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_adapter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAdapter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_task(message: impl Into<String>) -> Self {
        Self::InvalidTask {
            message: message.into(),
        }
    }

    /// Classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized => ErrorKind::NotInitialized,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::InvalidAdapter { .. } => ErrorKind::InvalidAdapter,
            Self::UnknownAdapter { .. } => ErrorKind::UnknownAdapter,
            Self::NoAvailableAdapter { .. } => ErrorKind::NoAvailableAdapter,
            Self::AdapterDispatch { .. } => ErrorKind::AdapterDispatch,
            Self::InvalidTask { .. } => ErrorKind::InvalidTask,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    /// Adapter implicated in this error, if any
    pub fn adapter(&self) -> Option<&str> {
        match self {
            Self::InvalidAdapter { name, .. } | Self::UnknownAdapter { name } => Some(name),
            Self::AdapterDispatch { adapter, .. } | Self::Timeout { adapter, .. } => Some(adapter),
            _ => None,
        }
    }
}
