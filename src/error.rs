//! Error types for the configuration and terminal layers
//!
//! The simulation itself never fails; only loading tuning files and
//! talking to the terminal can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShooterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid tuning value for `{field}`: {reason}")]
    InvalidTuning { field: &'static str, reason: String },
}

/// Result type alias for fallible shooter operations
pub type Result<T> = std::result::Result<T, ShooterError>;
