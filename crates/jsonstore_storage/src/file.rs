//! File-based storage backend for persistent storage.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// A file-based storage backend.
///
/// The whole file is the blob. Replacement never writes to the target
/// file in place.
///
/// # Durability
///
/// `replace` follows the write-then-rename pattern:
/// 1. Write to a uniquely named temporary file next to the target
/// 2. Sync the temporary file to disk (when `sync_on_write` is set)
/// 3. Rename the temporary file over the target
/// 4. Fsync the parent directory so the rename itself is durable
///
/// The temporary file is removed on every failure path. Parent
/// directories are never created: replacing a file inside a missing
/// directory fails with an I/O error.
///
/// # Example
///
/// ```no_run
/// use jsonstore_storage::{FileBackend, StorageBackend};
///
/// let mut backend = FileBackend::new("settings.json");
/// backend.replace(b"{\"theme\": \"dark\"}\n").unwrap();
/// assert!(backend.read().unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    sync_on_write: bool,
}

impl FileBackend {
    /// Creates a backend for `path`. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_on_write: true,
        }
    }

    /// Sets whether the temporary file is synced before it is renamed.
    #[must_use]
    pub fn sync_on_write(mut self, value: bool) -> Self {
        self.sync_on_write = value;
        self
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn temp_path(&self) -> StorageResult<PathBuf> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::NotAFile {
                path: self.path.clone(),
            })?
            .to_string_lossy();
        let temp_name = format!(".{name}.{}.tmp", Uuid::new_v4().simple());
        Ok(self.parent_dir().join(temp_name))
    }

    /// Syncs the parent directory so a completed rename survives a crash.
    ///
    /// By now the new content is already in place, so a failure is logged
    /// and not reported as a failed write.
    ///
    /// Windows NTFS journals metadata updates, and directories cannot be
    /// opened for syncing there, so this is a no-op off Unix.
    #[cfg(unix)]
    fn sync_parent(&self) {
        if let Err(e) = File::open(self.parent_dir()).and_then(|dir| dir.sync_all()) {
            warn!(
                location = %self.path.display(),
                error = %e,
                "parent directory sync failed after replace"
            );
        }
    }

    #[cfg(not(unix))]
    fn sync_parent(&self) {}
}

/// A missing file, or a path component that is not a directory.
fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

impl StorageBackend for FileBackend {
    fn read(&self) -> StorageResult<Option<Vec<u8>>> {
        match fs::metadata(&self.path) {
            Ok(meta) if !meta.is_file() => {
                return Err(StorageError::NotAFile {
                    path: self.path.clone(),
                })
            }
            Ok(_) => {}
            Err(e) if is_absent(&e) => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        match fs::read(&self.path) {
            Ok(data) => Ok(Some(data)),
            // Removed between the metadata call and the read.
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut temp = TempFile::create(self.temp_path()?)?;
        temp.write_all(data)?;
        if self.sync_on_write {
            temp.sync()?;
        }
        temp.persist(&self.path)?;

        if self.sync_on_write {
            self.sync_parent();
        }

        debug!(location = %self.path.display(), bytes = data.len(), "replaced backing file");
        Ok(())
    }

    fn exists(&self) -> StorageResult<bool> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if is_absent(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// A temporary file that deletes itself unless persisted.
struct TempFile {
    path: PathBuf,
    file: Option<File>,
    armed: bool,
}

impl TempFile {
    fn create(path: PathBuf) -> io::Result<Self> {
        let file = File::create(&path)?;
        Ok(Self {
            path,
            file: Some(file),
            armed: true,
        })
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => {
                file.write_all(data)?;
                file.flush()
            }
            None => Err(io::Error::new(io::ErrorKind::Other, "temporary file closed")),
        }
    }

    fn sync(&mut self) -> io::Result<()> {
        match self.file.as_ref() {
            Some(file) => file.sync_all(),
            None => Ok(()),
        }
    }

    /// Closes the handle and renames the file over `target`.
    fn persist(mut self, target: &Path) -> io::Result<()> {
        drop(self.file.take());
        fs::rename(&self.path, target)?;
        self.armed = false;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        drop(self.file.take());
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove temporary file");
            }
        }
    }
}
