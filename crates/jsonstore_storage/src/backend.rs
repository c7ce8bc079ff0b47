//! Storage backend trait definition.

use crate::error::StorageResult;
use std::path::Path;

/// A backing location holding one encoded document.
///
/// Backends are **opaque byte stores**. The document format is owned by the
/// caller; backends only move whole blobs in and out.
///
/// # Invariants
///
/// - `read` returns exactly the bytes of the last successful `replace`,
///   or `None` if nothing was ever written
/// - A failed `replace` leaves the previous blob intact
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::FileBackend`] - For persistent storage
/// - [`super::InMemoryBackend`] - For testing
pub trait StorageBackend: Send + Sync {
    /// Reads the whole blob.
    ///
    /// Returns `Ok(None)` if the location does not exist. A location whose
    /// parent directory is missing also does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the location exists but cannot be read.
    fn read(&self) -> StorageResult<Option<Vec<u8>>>;

    /// Replaces the whole blob with `data`.
    ///
    /// After this returns successfully the new blob is durable to the
    /// degree the backend supports. On error the previous blob is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be written.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns true if the location currently holds a blob.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.read()?.is_some())
    }

    /// Returns the file system path, if the backend has one.
    fn path(&self) -> Option<&Path> {
        None
    }

    /// Human-readable description of the location, for logs and errors.
    fn describe(&self) -> String;
}
