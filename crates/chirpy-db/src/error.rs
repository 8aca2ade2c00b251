use std::path::PathBuf;

use chirpy_auth::AuthError;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("not the author of this chirp")]
    Forbidden,
    #[error(transparent)]
    Password(#[from] AuthError),

    // Startup: the service cannot run without a readable snapshot.
    #[error("snapshot file {} does not exist", .path.display())]
    Missing { path: PathBuf },
    #[error("snapshot file {} is unusable: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("snapshot i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// True for failures of the snapshot file rather than of the caller's
    /// request.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            StoreError::Missing { .. }
                | StoreError::Corrupt { .. }
                | StoreError::Io(_)
                | StoreError::Serialization(_)
        )
    }
}
