//! Error types for the auto-zoom library

use thiserror::Error;

/// Result type alias for the auto-zoom library
pub type Result<T> = std::result::Result<T, AutoZoomError>;

/// Errors that can occur around the auto-zoom pipeline
#[derive(Error, Debug)]
pub enum AutoZoomError {
    #[error("Detection failed: {0}")]
    DetectionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AutoZoomError {
    pub fn detection<S: Into<String>>(msg: S) -> Self {
        Self::DetectionError(msg.into())
    }

    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }
}
