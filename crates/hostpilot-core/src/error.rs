//! Error types for harness operations

use crate::status::JobStatus;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Control plane rejected {operation}: {message}")]
    Api { operation: String, message: String },

    #[error("HTTP transport error: {0}")]
    Transport(String),

    #[error("Job did not reach a terminal status within {waited:?} (last status: {last_status})")]
    PollTimeout {
        waited: Duration,
        last_status: JobStatus,
    },

    #[error("Missing configuration value: {0}")]
    MissingConfig(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    /// Build an API error for a named control-plane operation.
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        HarnessError::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Result type for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;
