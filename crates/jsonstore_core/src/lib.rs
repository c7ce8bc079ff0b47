//! # jsonstore core
//!
//! A mutable JSON-like document kept in memory and backed by one file, with
//! commit/rollback transactions on top.
//!
//! This crate provides:
//! - [`Store`]: loads the document once, owns it, and commits it
//! - [`Transaction`]: a snapshot plus a state machine resolved exactly once
//! - Scoped transactions that commit on success and apply a rollback
//!   policy on failure
//! - Dry-run mode: every transition happens, nothing is written
//!
//! ## Durability
//!
//! A commit replaces the backing file through a temporary file and a
//! rename, so a reader never observes a half-written document. Without a
//! commit nothing is ever written; dropping a store loses pending edits.
//!
//! ## Misuse
//!
//! Resolving a transaction twice, rolling back a transaction opened without
//! rollback, and rolling back a store with no pending transaction are bugs
//! in the caller. They panic (see [`Fault`]) instead of returning `Err`.
//!
//! ## Example
//!
//! ```no_run
//! use jsonstore_core::{json, Store, StoreConfig};
//!
//! let mut store = Store::load("state.yaml")?;
//!
//! // Commit on success.
//! store.scoped(|doc| {
//!     doc.insert("foo".into(), json!("bar"));
//!     Ok::<_, std::io::Error>(())
//! })
//! .unwrap();
//!
//! // Explicit transaction, rolled back by hand.
//! let txn = store.open_transaction(true);
//! store.content_mut().insert("foo".into(), json!("baz"));
//! txn.rollback(&mut store);
//! assert_eq!(store.view()["foo"], "bar");
//!
//! // Dry run: same transitions, no writes.
//! let mut rehearsal = Store::load_with_config("state.yaml", StoreConfig::new().dry_run(true))?;
//! rehearsal.content_mut().clear();
//! rehearsal.commit()?;
//! # Ok::<(), jsonstore_core::StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod scope;
mod store;
mod transaction;
mod types;

pub use config::StoreConfig;
pub use error::{CommitFailure, Fault, StoreError, StoreResult};
pub use scope::ScopeError;
pub use store::Store;
pub use transaction::{Transaction, TransactionState};
pub use types::{StoreId, TransactionId};

pub use jsonstore_codec::{json, CodecError, Document, DocumentCodec, Format, Map, Value};
pub use jsonstore_storage::{FileBackend, InMemoryBackend, StorageBackend, StorageError};
