use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Absent posts and comments are not errors, they come back as `None`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error - path={path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Error parsing post document - file={path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Error writing post document: {0}")]
    Write(String),
}

impl StoreError {
    pub fn storage(path: &Path, source: io::Error) -> StoreError {
        StoreError::Storage { path: path.to_path_buf(), source }
    }

    pub fn parse(path: &Path, reason: impl Into<String>) -> StoreError {
        StoreError::Parse { path: path.to_path_buf(), reason: reason.into() }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, StoreError::Parse { .. })
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage { .. })
    }
}
