//! Error types for the store.
//!
//! Two kinds of failure exist:
//!
//! - [`StoreError`]: environmental conditions (undecodable file, failed
//!   write). Always returned as `Err` for the caller to inspect.
//! - [`Fault`]: caller bugs (resolving a transaction twice, rolling back
//!   without a rollback-enabled pending transaction). Never returned;
//!   raised as a panic carrying the fault's message.

use crate::transaction::TransactionState;
use crate::types::{StoreId, TransactionId};
use jsonstore_codec::CodecError;
use jsonstore_storage::StorageError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Recoverable errors from loading or committing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing location exists but does not decode to a document.
    #[error("failed to decode {location}: {source}")]
    Decode {
        /// The backing location.
        location: String,
        /// The decoder's complaint.
        #[source]
        source: CodecError,
    },

    /// The backing location could not be written.
    #[error("failed to write {location}: {source}")]
    Write {
        /// The backing location.
        location: String,
        /// The storage failure.
        #[source]
        source: StorageError,
    },

    /// Storage backend error outside of a write (e.g. an unreadable file).
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Codec error outside of decoding (e.g. an unknown file extension).
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

impl StoreError {
    /// Creates a decode error.
    pub fn decode(location: impl Into<String>, source: CodecError) -> Self {
        Self::Decode {
            location: location.into(),
            source,
        }
    }

    /// Creates a write error.
    pub fn write(location: impl Into<String>, source: StorageError) -> Self {
        Self::Write {
            location: location.into(),
            source,
        }
    }

    /// Returns true if the backing location could not be decoded.
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }

    /// Returns true if a commit could not be written.
    #[must_use]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write { .. })
    }
}

/// The recorded outcome of a transaction whose commit failed.
///
/// A transaction keeps this instead of the original [`StoreError`] so the
/// result can be queried any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("commit failed: {message}")]
pub struct CommitFailure {
    message: String,
}

impl CommitFailure {
    /// Returns the message of the error that failed the commit.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&StoreError> for CommitFailure {
    fn from(err: &StoreError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Misuse of the transaction API.
///
/// These indicate a logic bug in the caller. They abort the operation with
/// a panic and are never handed back as a `Result`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Fault {
    /// Commit or rollback on a transaction that is no longer pending.
    #[error("{txn} already resolved as {state}")]
    AlreadyResolved {
        /// The transaction.
        txn: TransactionId,
        /// Its terminal state.
        state: TransactionState,
    },

    /// Rollback on a transaction opened without rollback support.
    #[error("{txn} was opened with rollback disabled")]
    RollbackDisabled {
        /// The transaction.
        txn: TransactionId,
    },

    /// Store-level rollback with no pending transaction.
    #[error("no pending transaction to roll back")]
    NothingToRollBack,

    /// A transaction resolved against a store that did not open it.
    #[error("{txn} belongs to {owner}, not {store}")]
    ForeignStore {
        /// The transaction.
        txn: TransactionId,
        /// The store that opened it.
        owner: StoreId,
        /// The store it was resolved against.
        store: StoreId,
    },
}

impl Fault {
    /// Aborts with this fault.
    #[track_caller]
    pub(crate) fn raise(self) -> ! {
        panic!("transaction misuse: {self}")
    }
}
