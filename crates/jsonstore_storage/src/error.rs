//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backend refuses writes.
    #[error("storage is read-only: {location}")]
    ReadOnly {
        /// Where the write was attempted.
        location: String,
    },

    /// The backing path exists but is not a regular file.
    #[error("not a regular file: {}", path.display())]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },
}

impl StorageError {
    /// Creates a read-only error.
    pub fn read_only(location: impl Into<String>) -> Self {
        Self::ReadOnly {
            location: location.into(),
        }
    }

    /// Returns true if the underlying cause is a missing file or directory.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
        )
    }
}
