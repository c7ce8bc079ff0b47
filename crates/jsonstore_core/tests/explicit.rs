//! Transactions resolved by hand, through the handle or through the store.

use jsonstore_core::{json, Store, TransactionState};
use jsonstore_testkit::prelude::*;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

fn assert_fault<F: FnOnce()>(f: F) {
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).expect_err("expected a misuse fault");
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .unwrap_or_default();
    assert!(
        message.starts_with("transaction misuse"),
        "unexpected panic: {message}"
    );
}

fn edit(store: &mut Store) {
    store.content_mut().insert("foo".into(), json!("bar"));
    store
        .content_mut()
        .insert("nested".into(), json!({"baz": 123}));
}

fn assert_persisted(path: &Path, dry_run: bool) {
    let reloaded = reload(path);
    if dry_run {
        assert!(reloaded.view().is_empty());
    } else {
        assert_eq!(reloaded.view()["foo"], "bar");
        assert_eq!(reloaded.view()["nested"]["baz"], 123);
    }
}

#[test]
fn commit_on_handle_persists() {
    for allow_rollback in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            let txn = store.open_transaction(allow_rollback);
            edit(&mut store);

            assert_eq!(txn.commit(&mut store).unwrap(), TransactionState::Committed);
            assert_eq!(txn.result(), Some(Ok(TransactionState::Committed)));
            assert_eq!(store.view().len(), 2);
            assert_persisted(&path, dry_run);
        });
    }
}

#[test]
fn commit_on_store_resolves_pending_transaction() {
    for allow_rollback in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            let txn = store.open_transaction(allow_rollback);
            edit(&mut store);

            assert_eq!(store.commit().unwrap(), TransactionState::Committed);
            assert_eq!(txn.state(), TransactionState::Committed);
            assert_persisted(&path, dry_run);
        });
    }
}

#[test]
fn rollback_restores_through_either_route() {
    for on_store in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            let txn = store.open_transaction(true);
            edit(&mut store);

            let state = if on_store {
                store.rollback()
            } else {
                txn.rollback(&mut store)
            };

            assert_eq!(state, TransactionState::RolledBack);
            assert_eq!(txn.result(), Some(Ok(TransactionState::RolledBack)));
            assert!(store.view().is_empty());
            assert!(reload(&path).view().is_empty());
        });
    }
}

#[test]
fn nothing_written_without_commit() {
    for allow_rollback in [None, Some(false), Some(true)] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            let txn = allow_rollback.map(|allow| store.open_transaction(allow));
            edit(&mut store);

            assert!(reload(&path).view().is_empty());
            assert!(!path.exists());
            if let Some(txn) = txn {
                assert!(txn.is_pending());
            }
        });
    }
}

#[test]
fn direct_commit_without_transaction() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);
        edit(&mut store);

        assert_eq!(store.commit().unwrap(), TransactionState::Committed);
        assert!(store.active_transaction().is_none());
        assert_persisted(&path, dry_run);
    });
}

#[test]
fn direct_commit_is_repeatable() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);
        edit(&mut store);

        store.commit().unwrap();
        store.content_mut()["nested"]["baz"] = json!(321);
        store.commit().unwrap();

        let reloaded = reload(&path);
        if dry_run {
            assert!(reloaded.view().is_empty());
        } else {
            assert_eq!(reloaded.view()["nested"]["baz"], 321);
        }
    });
}

#[test]
fn rollback_without_transaction_is_a_fault() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let mut store = open_store(&dir.file(ext), dry_run);
        edit(&mut store);

        assert_fault(|| {
            store.rollback();
        });
        assert_eq!(store.view().len(), 2);
    });
}

#[test]
fn committing_twice_is_a_fault() {
    for allow_rollback in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let mut store = open_store(&dir.file(ext), dry_run);

            let txn = store.open_transaction(allow_rollback);
            edit(&mut store);
            txn.commit(&mut store).unwrap();

            assert_fault(|| {
                let _ = txn.commit(&mut store);
            });
            assert_eq!(txn.state(), TransactionState::Committed);
        });
    }
}

#[test]
fn rollback_disabled_is_a_fault() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let mut store = open_store(&dir.file(ext), dry_run);

        let txn = store.open_transaction(false);
        edit(&mut store);

        assert_fault(|| {
            txn.rollback(&mut store);
        });
        assert!(txn.is_pending());
        assert_eq!(store.view().len(), 2);

        assert_fault(|| {
            store.rollback();
        });
    });
}

#[test]
fn rollback_after_commit_is_a_fault() {
    // (commit through the store, roll back through the store)
    let routes = [(false, false), (false, true), (true, false), (true, true)];
    for allow_rollback in [false, true] {
        for (commit_on_store, rollback_on_store) in routes {
            for_each_variant(|ext, dry_run| {
                let dir = ScratchDir::new();
                let mut store = open_store(&dir.file(ext), dry_run);

                let txn = store.open_transaction(allow_rollback);
                edit(&mut store);
                if commit_on_store {
                    store.commit().unwrap();
                } else {
                    txn.commit(&mut store).unwrap();
                }

                assert_fault(|| {
                    if rollback_on_store {
                        store.rollback();
                    } else {
                        txn.rollback(&mut store);
                    }
                });
                assert_eq!(store.view().len(), 2);
            });
        }
    }
}

#[test]
fn commit_on_handle_after_rollback_is_a_fault() {
    for on_store in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let mut store = open_store(&dir.file(ext), dry_run);

            let txn = store.open_transaction(true);
            edit(&mut store);
            if on_store {
                store.rollback();
            } else {
                txn.rollback(&mut store);
            }

            assert_fault(|| {
                let _ = txn.commit(&mut store);
            });
            assert!(store.view().is_empty());
        });
    }
}

#[test]
fn commit_on_store_after_rollback_writes_directly() {
    for on_store in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            let txn = store.open_transaction(true);
            edit(&mut store);
            if on_store {
                store.rollback();
            } else {
                txn.rollback(&mut store);
            }

            edit(&mut store);
            assert_eq!(store.commit().unwrap(), TransactionState::Committed);
            assert_eq!(txn.state(), TransactionState::RolledBack);
            assert_persisted(&path, dry_run);
        });
    }
}
