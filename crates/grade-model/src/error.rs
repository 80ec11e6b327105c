//! Model Error Types

use thiserror::Error;

/// Errors from model loading and prediction
#[derive(Debug, Error)]
pub enum ModelError {
    /// No model registered for the requested key
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Model directory or file could not be read
    #[error("failed to read model path {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Model file exists but does not parse
    #[error("invalid model file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
