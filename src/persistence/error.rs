use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("No snapshot at '{0}'")]
    NotFound(PathBuf),

    #[error("Failed to read snapshot '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Snapshot '{0}' is not a valid readings file")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Snapshot '{path}' lists location '{name}' more than once")]
    DuplicateName { path: PathBuf, name: String },

    #[error("Snapshot '{path}' does not match the location catalog: {detail}")]
    CatalogMismatch { path: PathBuf, detail: String },

    #[error("Failed to create snapshot directory '{0}'")]
    CreateDir(PathBuf, #[source] std::io::Error),

    #[error("Failed to encode readings")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write snapshot to temporary file in '{0}'")]
    Write(PathBuf, #[source] std::io::Error),

    #[error("Failed to move snapshot into place at '{0}'")]
    Persist(PathBuf, #[source] std::io::Error),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl PersistenceError {
    /// True when a snapshot file exists but cannot be trusted.
    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            PersistenceError::Decode(..)
                | PersistenceError::DuplicateName { .. }
                | PersistenceError::CatalogMismatch { .. }
        )
    }
}
