//! Error handling for vizstream
//!
//! This module defines the crate-wide error type and a Result alias.

use thiserror::Error;

/// Main error type for vizstream operations
#[derive(Error, Debug)]
pub enum VizStreamError {
    /// Errors reported by the display backend
    #[error("Backend error: {0}")]
    Backend(String),

    /// A window-creation call failed
    #[error("Failed to create window '{name}': {message}")]
    WindowCreation { name: String, message: String },

    /// The dispatch queue is full and the queue policy rejects new requests
    #[error("Dispatch queue is full")]
    QueueFull,

    /// The dispatch worker has stopped or was never started
    #[error("Dispatch worker is not running")]
    WorkerUnavailable,

    /// A series cache reached its configured capacity under the fail-fast policy
    #[error("Series cache for '{series}' is full (capacity {capacity})")]
    CacheFull { series: String, capacity: usize },

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for vizstream operations
pub type Result<T> = std::result::Result<T, VizStreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VizStreamError::Backend("connection refused".to_string());
        assert_eq!(err.to_string(), "Backend error: connection refused");
    }

    #[test]
    fn test_cache_full_error() {
        let err = VizStreamError::CacheFull {
            series: "loss_train".to_string(),
            capacity: 128,
        };
        assert!(err.to_string().contains("loss_train"));
        assert!(err.to_string().contains("128"));
    }

    #[test]
    fn test_window_creation_error() {
        let err = VizStreamError::WindowCreation {
            name: "loss".to_string(),
            message: "server unreachable".to_string(),
        };
        assert!(err.to_string().contains("loss"));
        assert!(err.to_string().contains("server unreachable"));
    }
}
