//! Transactions over a store's content.
//!
//! A transaction does not intercept edits. It remembers a deep copy of the
//! content taken when it was opened, and is resolved exactly once:
//!
//! - **commit** persists the store's *current* content
//! - **rollback** puts the snapshot back into the store
//!
//! A [`Transaction`] is a cheap handle. The store keeps one clone in its
//! active-transaction slot and the caller may keep others; all of them see
//! the same state, so resolving through the store is visible through the
//! caller's handle and vice versa.

mod state;

pub use state::TransactionState;

pub(crate) use state::TransactionInner;

use crate::error::{CommitFailure, StoreResult};
use crate::store::Store;
use crate::types::TransactionId;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Handle to a transaction opened by [`Store::open_transaction`].
///
/// # Example
///
/// ```
/// use jsonstore_core::{json, Format, InMemoryBackend, Store, TransactionState};
///
/// let mut store = Store::open_with_backend(
///     Box::new(InMemoryBackend::new()),
///     Box::new(Format::Json),
///     Default::default(),
/// )
/// .unwrap();
///
/// let txn = store.open_transaction(true);
/// store.content_mut().insert("foo".into(), json!("bar"));
/// assert_eq!(txn.rollback(&mut store), TransactionState::RolledBack);
/// assert!(store.view().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Transaction {
    inner: Arc<Mutex<TransactionInner>>,
}

impl Transaction {
    pub(crate) fn new(inner: TransactionInner) -> Self {
        Self {
            inner: Arc::new(Mutex::new(inner)),
        }
    }

    /// Returns the transaction ID.
    #[must_use]
    pub fn id(&self) -> TransactionId {
        self.inner.lock().id
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TransactionState {
        self.inner.lock().state()
    }

    /// Checks if the transaction can still be resolved.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == TransactionState::Pending
    }

    /// Returns whether rollback was enabled when the transaction opened.
    #[must_use]
    pub fn allow_rollback(&self) -> bool {
        self.inner.lock().allow_rollback
    }

    /// Returns the outcome, or `None` while pending.
    ///
    /// A failed commit yields `Some(Err(..))`; the other terminal states
    /// yield `Some(Ok(state))`.
    #[must_use]
    pub fn result(&self) -> Option<Result<TransactionState, CommitFailure>> {
        self.inner.lock().result()
    }

    /// Returns true if both handles refer to the same transaction.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Persists the store's current content and resolves as committed.
    ///
    /// Under a dry run nothing is written, but the transaction still
    /// becomes `Committed`. If the write fails the transaction becomes
    /// `Failed` and the error is returned; the store's content keeps every
    /// edit made so far.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be encoded or written.
    ///
    /// # Panics
    ///
    /// Panics if the transaction is already resolved, or if `store` is not
    /// the store that opened it.
    #[track_caller]
    pub fn commit(&self, store: &mut Store) -> StoreResult<TransactionState> {
        let mut inner = self.inner.lock();
        inner.ensure_owner(store.id());
        inner.ensure_pending();

        match store.persist() {
            Ok(()) => {
                inner.mark_committed();
                info!(txn = %inner.id, dry_run = store.is_dry_run(), "transaction committed");
                Ok(TransactionState::Committed)
            }
            Err(err) => {
                warn!(txn = %inner.id, error = %err, "transaction commit failed");
                inner.mark_failed(CommitFailure::from(&err));
                Err(err)
            }
        }
    }

    /// Restores the snapshot into the store and resolves as rolled back.
    ///
    /// Nothing is written; the backing location keeps whatever was last
    /// committed.
    ///
    /// # Panics
    ///
    /// Panics if the transaction is already resolved, was opened with
    /// rollback disabled, or belongs to a different store.
    #[track_caller]
    pub fn rollback(&self, store: &mut Store) -> TransactionState {
        let mut inner = self.inner.lock();
        inner.ensure_owner(store.id());
        inner.ensure_pending();
        inner.ensure_rollback_allowed();

        store.restore(inner.take_snapshot_for_rollback());
        info!(txn = %inner.id, "transaction rolled back");
        TransactionState::RolledBack
    }
}
