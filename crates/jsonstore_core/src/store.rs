//! The file-backed document store.

use crate::config::StoreConfig;
use crate::error::{Fault, StoreError, StoreResult};
use crate::transaction::{Transaction, TransactionInner, TransactionState};
use crate::types::{StoreId, TransactionId};
use jsonstore_codec::{Document, DocumentCodec, Format};
use jsonstore_storage::{FileBackend, StorageBackend};
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

/// An in-memory document backed by a single file.
///
/// The content is loaded once, at construction, and from then on the store
/// is the only source of truth. Edits go straight into [`content_mut`]
/// and are never written until something commits:
///
/// - [`Store::commit`] commits the pending transaction, or writes the
///   content directly when there is none
/// - [`Transaction::commit`] commits one specific transaction
///
/// Dropping a store discards uncommitted edits silently.
///
/// # Example
///
/// ```no_run
/// use jsonstore_core::{json, Store};
///
/// let mut store = Store::load("settings.json")?;
/// store.content_mut().insert("theme".into(), json!("dark"));
/// store.commit()?;
/// # Ok::<(), jsonstore_core::StoreError>(())
/// ```
///
/// [`content_mut`]: Store::content_mut
pub struct Store {
    id: StoreId,
    content: Document,
    backend: Box<dyn StorageBackend>,
    codec: Box<dyn DocumentCodec>,
    config: StoreConfig,
    active: Option<Transaction>,
    next_txid: TransactionId,
}

impl Store {
    /// Loads the store at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// See [`Store::load_with_config`].
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::load_with_config(path, StoreConfig::default())
    }

    /// Loads the store at `path`.
    ///
    /// The format is picked from the file extension. A missing file, or a
    /// file inside missing directories, gives an empty document; an
    /// unwritable location only shows up at commit time.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not a known format, the file
    /// cannot be read, or its content does not decode.
    pub fn load_with_config(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let backend = FileBackend::new(path).sync_on_write(config.sync_on_commit);
        Self::open_with_backend(Box::new(backend), Box::new(format), config)
    }

    /// Opens a store over an arbitrary backend and codec.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or its content does
    /// not decode.
    pub fn open_with_backend(
        backend: Box<dyn StorageBackend>,
        codec: Box<dyn DocumentCodec>,
        config: StoreConfig,
    ) -> StoreResult<Self> {
        let location = backend.describe();
        let content = match backend.read()? {
            Some(bytes) => codec
                .decode(&bytes)
                .map_err(|source| StoreError::decode(location.clone(), source))?,
            None => {
                debug!(%location, "backing location absent, starting empty");
                Document::new()
            }
        };

        let store = Self {
            id: StoreId::new(),
            content,
            backend,
            codec,
            config,
            active: None,
            next_txid: TransactionId::new(1),
        };
        info!(
            store = %store.id,
            %location,
            format = store.codec.name(),
            keys = store.content.len(),
            dry_run = store.config.dry_run,
            "store loaded"
        );
        Ok(store)
    }

    /// Returns the store ID.
    #[must_use]
    pub fn id(&self) -> StoreId {
        self.id
    }

    /// Returns the backing file path, if the backend has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.backend.path()
    }

    /// Returns true if commits skip the write.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.config.dry_run
    }

    /// Returns the current content for inspection.
    ///
    /// This never touches the active-transaction slot.
    #[must_use]
    pub fn view(&self) -> &Document {
        &self.content
    }

    /// Returns the current content for editing.
    ///
    /// Edits are live immediately and persisted by the next commit.
    pub fn content_mut(&mut self) -> &mut Document {
        &mut self.content
    }

    /// Consumes the store and returns its content, discarding the slot.
    #[must_use]
    pub fn into_content(self) -> Document {
        self.content
    }

    /// Returns whatever transaction occupies the active slot, resolved or
    /// not.
    #[must_use]
    pub fn active_transaction(&self) -> Option<&Transaction> {
        self.active.as_ref()
    }

    /// Snapshots the content and makes the new transaction the active one.
    ///
    /// Any previous occupant of the slot is replaced. If it was still
    /// pending it stays usable through the caller's own handle.
    pub fn open_transaction(&mut self, allow_rollback: bool) -> Transaction {
        let id = self.next_txid;
        self.next_txid = id.next();

        if let Some(previous) = self.pending_transaction() {
            warn!(
                txn = %id,
                replaced = %previous.id(),
                "opening transaction while another is pending"
            );
        }

        let txn = Transaction::new(TransactionInner::new(
            id,
            self.id,
            self.content.clone(),
            allow_rollback,
        ));
        self.active = Some(txn.clone());
        debug!(txn = %id, allow_rollback, "transaction opened");
        txn
    }

    /// Commits the pending transaction, or writes the content directly.
    ///
    /// With no pending transaction this is always legal and re-persists the
    /// current content on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be written.
    #[track_caller]
    pub fn commit(&mut self) -> StoreResult<TransactionState> {
        match self.pending_transaction() {
            Some(txn) => txn.commit(self),
            None => {
                self.persist()?;
                info!(store = %self.id, dry_run = self.config.dry_run, "content committed");
                Ok(TransactionState::Committed)
            }
        }
    }

    /// Rolls back the pending transaction.
    ///
    /// # Panics
    ///
    /// Panics if there is no pending transaction (committed content has no
    /// earlier snapshot to return to), or if the pending transaction was
    /// opened with rollback disabled.
    #[track_caller]
    pub fn rollback(&mut self) -> TransactionState {
        match self.pending_transaction() {
            Some(txn) => txn.rollback(self),
            None => Fault::NothingToRollBack.raise(),
        }
    }

    fn pending_transaction(&self) -> Option<Transaction> {
        self.active.as_ref().filter(|txn| txn.is_pending()).cloned()
    }

    /// Encodes the content and writes it, unless this is a dry run.
    pub(crate) fn persist(&mut self) -> StoreResult<()> {
        let bytes = self.codec.encode(&self.content)?;
        let location = self.backend.describe();

        if self.config.dry_run {
            debug!(%location, bytes = bytes.len(), "dry run, write skipped");
            return Ok(());
        }

        self.backend
            .replace(&bytes)
            .map_err(|source| StoreError::write(location, source))
    }

    pub(crate) fn restore(&mut self, snapshot: Document) {
        self.content = snapshot;
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("id", &self.id)
            .field("location", &self.backend.describe())
            .field("codec", &self.codec)
            .field("config", &self.config)
            .field("keys", &self.content.len())
            .field("active", &self.active.as_ref().map(Transaction::id))
            .finish()
    }
}
