//! Archive error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while building or extracting an archive.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("not found: {path}")]
    NotFound { path: PathBuf },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("corrupt archive {path}: {reason}")]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArchiveError {
    pub(crate) fn not_found(path: &Path) -> Self {
        ArchiveError::NotFound {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn corrupt(path: &Path, reason: impl ToString) -> Self {
        ArchiveError::CorruptArchive {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
