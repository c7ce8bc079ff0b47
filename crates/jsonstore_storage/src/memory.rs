//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend keeps the blob in memory and is suitable for:
/// - Unit tests
/// - Exercising write-failure paths without touching the file system
///
/// Clones share the same blob, so a test can keep one handle for
/// inspection while a store owns the other.
///
/// # Example
///
/// ```rust
/// use jsonstore_storage::{InMemoryBackend, StorageBackend};
///
/// let mut backend = InMemoryBackend::new();
/// let observer = backend.clone();
///
/// backend.replace(b"{}").unwrap();
/// assert_eq!(observer.data(), Some(b"{}".to_vec()));
///
/// backend.set_read_only(true);
/// assert!(backend.replace(b"[]").is_err());
/// assert_eq!(observer.data(), Some(b"{}".to_vec()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    data: Option<Vec<u8>>,
    read_only: bool,
    writes: u64,
}

impl InMemoryBackend {
    /// Creates a new backend with no blob.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new backend holding `data`.
    #[must_use]
    pub fn with_data(data: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        backend.inner.write().data = Some(data.into());
        backend
    }

    /// Returns a copy of the current blob.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.inner.read().data.clone()
    }

    /// Makes subsequent `replace` calls fail (or succeed again).
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.write().read_only = read_only;
    }

    /// Returns how many successful replacements happened.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.read().writes
    }
}

impl StorageBackend for InMemoryBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.inner.read().data.clone())
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut inner = self.inner.write();
        if inner.read_only {
            return Err(StorageError::read_only("memory"));
        }
        inner.data = Some(data.to_vec());
        inner.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
