//! Error types for robot configuration and dispatch

use ripple_editor::EditorError;
use std::time::Duration;
use thiserror::Error;

/// Bad handler registration or unreadable configuration. Raised at startup,
/// never recoverable inside a batch.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Unknown event: {0}")]
    InvalidEventKind(String),

    #[error("Unknown handler: {0}")]
    InvalidHandler(String),

    #[error("Cron job {path}: interval {interval:?} is not a whole number of seconds")]
    InvalidCronInterval { path: String, interval: Duration },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum RobotError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Handler failed: {0}")]
    Handler(String),
}

impl RobotError {
    pub fn handler(message: impl Into<String>) -> Self {
        RobotError::Handler(message.into())
    }
}
