//! Test fixtures and store helpers.
//!
//! Provides scratch directories, sample file contents and shortcuts for
//! loading and reloading stores.

use jsonstore_core::{Store, StoreConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Extensions of the text formats every scenario is run against.
pub const TEXT_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// A well-formed file holding `{"foo": {"bar": "baz"}}` in the format of `ext`.
///
/// # Panics
///
/// Panics for extensions other than [`TEXT_EXTENSIONS`].
pub fn sample_content(ext: &str) -> &'static str {
    match ext {
        "json" => "\n{\n    \"foo\": {\n        \"bar\": \"baz\"\n    }\n}\n",
        "yaml" | "yml" => "\nfoo:\n    bar: baz\n",
        other => panic!("no sample content for {other:?}"),
    }
}

/// A file in the format of `ext` that must fail to decode.
///
/// # Panics
///
/// Panics for extensions other than [`TEXT_EXTENSIONS`].
pub fn broken_content(ext: &str) -> &'static str {
    match ext {
        "json" => "\n    \"foo\": {\n        \"bar\": \"baz\"\n    }\n}\n",
        "yaml" | "yml" => "\n%aieatie\n",
        other => panic!("no broken content for {other:?}"),
    }
}

/// A temporary directory that is removed on drop.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a new scratch directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of `test.<ext>` inside the directory. Nothing is created.
    pub fn file(&self, ext: &str) -> PathBuf {
        self.dir.path().join(format!("test.{ext}"))
    }

    /// Path of `test.<ext>` below directories that do not exist.
    pub fn unreachable_file(&self, ext: &str) -> PathBuf {
        self.dir
            .path()
            .join("invalid")
            .join("non")
            .join("existing")
            .join("path")
            .join(format!("test.{ext}"))
    }

    /// Writes `content` to `test.<ext>` and returns its path.
    pub fn write_file(&self, ext: &str, content: &str) -> PathBuf {
        let path = self.file(ext);
        fs::write(&path, content).expect("Failed to write fixture file");
        path
    }
}

impl Default for ScratchDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Loads a store, panicking on failure.
pub fn open_store(path: &Path, dry_run: bool) -> Store {
    Store::load_with_config(path, StoreConfig::new().dry_run(dry_run))
        .expect("Failed to load store")
}

/// Loads `path` afresh without a dry run, as an independent observer.
pub fn reload(path: &Path) -> Store {
    open_store(path, false)
}

/// Runs `f` once for every text extension and both dry-run settings.
pub fn for_each_variant<F>(mut f: F)
where
    F: FnMut(&str, bool),
{
    for ext in TEXT_EXTENSIONS {
        for dry_run in [false, true] {
            f(ext, dry_run);
        }
    }
}

/// Installs a test-writer tracing subscriber once per process.
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
