use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading artifacts or running a prediction.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Failed to read artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode artifact {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Feature width mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Class label {0} is not a sentiment label (expected 0 or 1)")]
    InvalidLabel(i64),
}

impl ModelError {
    pub fn invalid<S: Into<String>>(message: S) -> Self {
        ModelError::InvalidArtifact(message.into())
    }
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
