//! Core error types for focuswork-core.
//!
//! Every error here is local and recoverable: the calling UI layer surfaces
//! a message and the timer state is left as it was before the call.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focuswork-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Required input missing or out of range
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation not supported in the current timer state
    #[error("Invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification playback errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty
    #[error("'{field}' is required")]
    MissingField { field: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub fn missing(field: &str) -> Self {
        ValidationError::MissingField {
            field: field.to_string(),
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Errors for operations called in a state that does not support them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidStateError {
    /// No session has been started
    #[error("cannot {operation}: no active session")]
    NotStarted { operation: &'static str },

    /// A session is in progress
    #[error("cannot {operation} while a session is active")]
    SessionActive { operation: &'static str },

    /// The timer service task has shut down
    #[error("timer service is not running")]
    ServiceStopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine or create the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Notification delivery errors. The engine logs these and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// No playback device or notification daemon
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    /// Backend accepted the request but failed to play it
    #[error("notification playback failed: {0}")]
    PlaybackFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
