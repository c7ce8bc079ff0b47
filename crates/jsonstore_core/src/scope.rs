//! Scoped transactions: open, run a closure, resolve.

use crate::error::{StoreError, StoreResult};
use crate::store::Store;
use crate::transaction::{Transaction, TransactionState};
use jsonstore_codec::Document;
use std::panic::{self, AssertUnwindSafe};
use thiserror::Error;
use tracing::warn;

/// Why a scoped transaction did not return a value.
#[derive(Debug, Error)]
pub enum ScopeError<E> {
    /// The closure failed. The transaction was resolved by its policy
    /// (rolled back if rollback was enabled, committed otherwise) before
    /// the error was handed back.
    #[error("transaction body failed: {error}")]
    Body {
        /// The closure's error.
        error: E,
        /// How the transaction was resolved.
        resolution: StoreResult<TransactionState>,
    },

    /// The closure succeeded but the commit did not.
    #[error("commit failed: {0}")]
    Commit(#[source] StoreError),
}

impl<E> ScopeError<E> {
    /// Returns the closure's error, if the closure failed.
    pub fn body_error(&self) -> Option<&E> {
        match self {
            Self::Body { error, .. } => Some(error),
            Self::Commit(_) => None,
        }
    }

    /// Consumes the scope error and returns the closure's error, if any.
    pub fn into_body_error(self) -> Option<E> {
        match self {
            Self::Body { error, .. } => Some(error),
            Self::Commit(_) => None,
        }
    }
}

impl Store {
    /// Runs `f` against the content inside a new transaction.
    ///
    /// - `Ok` from `f`: the transaction is committed.
    /// - `Err` from `f`: the transaction is rolled back when
    ///   `allow_rollback` is set and committed otherwise; the error is
    ///   always returned in [`ScopeError::Body`].
    /// - A panic in `f` is resolved by the same policy and then resumed.
    ///
    /// The transaction stays in the active slot afterwards, so its outcome
    /// can be read back through [`Store::active_transaction`].
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::Body`] if `f` fails, or
    /// [`ScopeError::Commit`] if the commit after a successful `f` fails.
    ///
    /// # Example
    ///
    /// ```
    /// use jsonstore_core::{json, Format, InMemoryBackend, Store, StoreConfig};
    ///
    /// let mut store = Store::open_with_backend(
    ///     Box::new(InMemoryBackend::new()),
    ///     Box::new(Format::Json),
    ///     StoreConfig::default(),
    /// )
    /// .unwrap();
    ///
    /// let result: Result<(), _> = store.transaction(true, |doc| {
    ///     doc.insert("foo".into(), json!("bar"));
    ///     Err("changed my mind")
    /// });
    ///
    /// assert_eq!(result.unwrap_err().into_body_error(), Some("changed my mind"));
    /// assert!(store.view().is_empty());
    /// ```
    pub fn transaction<T, E, F>(&mut self, allow_rollback: bool, f: F) -> Result<T, ScopeError<E>>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
    {
        let txn = self.open_transaction(allow_rollback);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| f(self.content_mut())));

        match outcome {
            Ok(Ok(value)) => {
                txn.commit(self).map_err(ScopeError::Commit)?;
                Ok(value)
            }
            Ok(Err(error)) => {
                let resolution = self.resolve_after_failure(&txn);
                Err(ScopeError::Body { error, resolution })
            }
            Err(payload) => {
                if let Err(err) = self.resolve_after_failure(&txn) {
                    warn!(txn = %txn.id(), error = %err, "commit after panic failed");
                }
                panic::resume_unwind(payload)
            }
        }
    }

    /// Runs `f` in a transaction with rollback enabled.
    ///
    /// Shorthand for `transaction(true, f)`.
    ///
    /// # Errors
    ///
    /// See [`Store::transaction`].
    pub fn scoped<T, E, F>(&mut self, f: F) -> Result<T, ScopeError<E>>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
    {
        self.transaction(true, f)
    }

    fn resolve_after_failure(&mut self, txn: &Transaction) -> StoreResult<TransactionState> {
        if txn.allow_rollback() {
            Ok(txn.rollback(self))
        } else {
            txn.commit(self)
        }
    }
}
