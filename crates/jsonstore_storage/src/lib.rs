//! # jsonstore storage
//!
//! Backing-location byte stores for jsonstore.
//!
//! A backend holds exactly one opaque blob: the encoded form of a document.
//! It never interprets those bytes. The two operations that matter are
//! reading the whole blob and replacing it in one step.
//!
//! ## Guarantees
//!
//! - `read` reports a missing location as `Ok(None)`, never as an error
//! - `replace` is all-or-nothing: a reader sees either the old blob or the
//!   new one, never a prefix of the new one
//! - Backends are `Send + Sync`
//!
//! ## Available Backends
//!
//! - [`FileBackend`] - OS files, replaced via temporary file and rename
//! - [`InMemoryBackend`] - For tests, with a switch to simulate write failures
//!
//! ## Example
//!
//! ```rust
//! use jsonstore_storage::{InMemoryBackend, StorageBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.read().unwrap().is_none());
//!
//! backend.replace(b"{}").unwrap();
//! assert_eq!(backend.read().unwrap().as_deref(), Some(&b"{}"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
