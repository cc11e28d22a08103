use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for Idlewatch.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("corrupt state file {}: {reason}", .path.display())]
    CorruptState { path: PathBuf, reason: String },

    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode state: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("not authorized")]
    Unauthorized,

    #[error("platform error: {0}")]
    Platform(String),
}

impl WatchError {
    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptState { path: path.into(), reason: reason.into() }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persistence { path: path.into(), source }
    }
}

pub type WatchResult<T> = Result<T, WatchError>;
