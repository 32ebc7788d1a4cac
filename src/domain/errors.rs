//! Domain errors for the issue synchronization run.

use thiserror::Error;

/// Errors that can occur while collecting issues or reconciling board tasks.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The issue tracker (GitHub) could not serve a request.
    #[error("Issue tracker unavailable during {operation}: {message}")]
    TrackerUnavailable { operation: String, message: String },

    /// The task board (Asana) could not serve a request.
    #[error("Task board unavailable during {operation}: {message}")]
    BoardUnavailable { operation: String, message: String },

    /// A task name did not match the encoded identifier shape.
    #[error("Task name is not a synchronized identifier: {0}")]
    DecodeFailure(String),

    /// The parts of an identifier cannot be encoded without ambiguity.
    #[error("Invalid task key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SyncError {
    /// Build a [`SyncError::TrackerUnavailable`] for the named operation.
    pub fn tracker(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TrackerUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build a [`SyncError::BoardUnavailable`] for the named operation.
    pub fn board(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BoardUnavailable {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
