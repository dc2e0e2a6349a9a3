//! Error types for Trimline.

use thiserror::Error;

/// Main error type for Trimline operations.
///
/// Geometry inputs are clamped rather than rejected, so this type only shows
/// up at I/O boundaries (config, session files) and for media failures.
#[derive(Error, Debug)]
pub enum TrimlineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Trimline operations.
pub type Result<T> = std::result::Result<T, TrimlineError>;
