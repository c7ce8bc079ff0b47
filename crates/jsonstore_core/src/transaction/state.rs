//! Transaction state.

use crate::error::{CommitFailure, Fault};
use crate::types::{StoreId, TransactionId};
use jsonstore_codec::Document;
use std::fmt;

/// State of a transaction.
///
/// ```text
/// Pending --commit ok-----> Committed   (terminal)
/// Pending --commit error--> Failed      (terminal)
/// Pending --rollback------> RolledBack  (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionState {
    /// Open; may still be committed or rolled back.
    Pending,
    /// The content was persisted (or the write skipped by a dry run).
    Committed,
    /// The content was restored from the snapshot.
    RolledBack,
    /// The commit's write failed. No retry is possible.
    Failed,
}

impl TransactionState {
    /// Returns true for every state except `Pending`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
            Self::Failed => "failed",
        })
    }
}

#[derive(Debug)]
enum Resolution {
    Pending,
    Committed,
    RolledBack,
    Failed(CommitFailure),
}

/// Shared state behind a [`super::Transaction`] handle.
#[derive(Debug)]
pub(crate) struct TransactionInner {
    pub(crate) id: TransactionId,
    pub(crate) store_id: StoreId,
    pub(crate) allow_rollback: bool,
    /// Content as it was when the transaction opened. Emptied on resolution.
    snapshot: Document,
    resolution: Resolution,
}

impl TransactionInner {
    pub(crate) fn new(
        id: TransactionId,
        store_id: StoreId,
        snapshot: Document,
        allow_rollback: bool,
    ) -> Self {
        Self {
            id,
            store_id,
            allow_rollback,
            snapshot,
            resolution: Resolution::Pending,
        }
    }

    pub(crate) fn state(&self) -> TransactionState {
        match self.resolution {
            Resolution::Pending => TransactionState::Pending,
            Resolution::Committed => TransactionState::Committed,
            Resolution::RolledBack => TransactionState::RolledBack,
            Resolution::Failed(_) => TransactionState::Failed,
        }
    }

    /// `None` while pending, the failure for a failed commit, else the state.
    pub(crate) fn result(&self) -> Option<Result<TransactionState, CommitFailure>> {
        match &self.resolution {
            Resolution::Pending => None,
            Resolution::Failed(failure) => Some(Err(failure.clone())),
            _ => Some(Ok(self.state())),
        }
    }

    /// Faults unless `store` is the store that opened this transaction.
    #[track_caller]
    pub(crate) fn ensure_owner(&self, store: StoreId) {
        if self.store_id != store {
            Fault::ForeignStore {
                txn: self.id,
                owner: self.store_id,
                store,
            }
            .raise();
        }
    }

    /// Faults unless the transaction is still pending.
    #[track_caller]
    pub(crate) fn ensure_pending(&self) {
        let state = self.state();
        if state.is_terminal() {
            Fault::AlreadyResolved {
                txn: self.id,
                state,
            }
            .raise();
        }
    }

    /// Faults unless rollback was enabled at creation.
    #[track_caller]
    pub(crate) fn ensure_rollback_allowed(&self) {
        if !self.allow_rollback {
            Fault::RollbackDisabled { txn: self.id }.raise();
        }
    }

    pub(crate) fn mark_committed(&mut self) {
        self.snapshot = Document::new();
        self.resolution = Resolution::Committed;
    }

    pub(crate) fn mark_failed(&mut self, failure: CommitFailure) {
        self.snapshot = Document::new();
        self.resolution = Resolution::Failed(failure);
    }

    /// Hands out the snapshot and marks the transaction rolled back.
    pub(crate) fn take_snapshot_for_rollback(&mut self) -> Document {
        self.resolution = Resolution::RolledBack;
        std::mem::take(&mut self.snapshot)
    }
}
