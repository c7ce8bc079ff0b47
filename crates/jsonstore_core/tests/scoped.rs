//! Scoped transactions against real files, for every text format, with and
//! without dry run.

use jsonstore_core::{json, Document, ScopeError, Store, TransactionState};
use jsonstore_testkit::prelude::*;
use std::path::Path;

fn last_state(store: &Store) -> TransactionState {
    store
        .active_transaction()
        .expect("no transaction in the slot")
        .state()
}

fn seed(doc: &mut Document) {
    assert!(doc.is_empty());
    doc.insert("foo".into(), json!("bar"));
    doc.insert("nested".into(), json!({"baz": 123}));
}

/// Asserts what an independent reader sees at `path`.
fn assert_persisted(path: &Path, dry_run: bool, baz: i64) {
    let reloaded = reload(path);
    if dry_run {
        assert!(reloaded.view().is_empty());
    } else {
        assert_eq!(reloaded.view().len(), 2);
        assert_eq!(reloaded.view()["foo"], "bar");
        assert_eq!(reloaded.view()["nested"]["baz"], baz);
    }
}

#[test]
fn success_commits_either_policy() {
    init_tracing();
    for allow_rollback in [false, true] {
        for_each_variant(|ext, dry_run| {
            let dir = ScratchDir::new();
            let path = dir.file(ext);
            let mut store = open_store(&path, dry_run);

            store
                .transaction(allow_rollback, |doc| {
                    seed(doc);
                    Ok::<_, &str>(())
                })
                .unwrap();
            assert_eq!(last_state(&store), TransactionState::Committed);

            store
                .transaction(allow_rollback, |doc| {
                    assert_eq!(doc.len(), 2);
                    doc["nested"]["baz"] = json!(321);
                    Ok::<_, &str>(())
                })
                .unwrap();
            assert_eq!(last_state(&store), TransactionState::Committed);

            assert_persisted(&path, dry_run, 321);
        });
    }
}

#[test]
fn failure_without_rollback_commits_through() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);

        let err = store
            .transaction(false, |doc| {
                seed(doc);
                Err::<(), _>("boom")
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ScopeError::Body {
                error: "boom",
                resolution: Ok(TransactionState::Committed),
            }
        ));
        assert_eq!(store.view()["foo"], "bar");
        assert_persisted(&path, dry_run, 123);
    });
}

#[test]
fn failure_with_rollback_restores_snapshot() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);

        let err = store
            .transaction(true, |doc| {
                seed(doc);
                Err::<(), _>("boom")
            })
            .unwrap_err();

        assert!(matches!(
            err,
            ScopeError::Body {
                resolution: Ok(TransactionState::RolledBack),
                ..
            }
        ));
        assert!(store.view().is_empty());
        assert!(reload(&path).view().is_empty());
    });
}

#[test]
fn failure_without_rollback_keeps_edits_to_existing_data() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);

        store
            .scoped(|doc| {
                seed(doc);
                Ok::<_, &str>(())
            })
            .unwrap();

        let result = store.transaction(false, |doc| {
            doc["nested"]["baz"] = json!(321);
            Err::<(), _>("boom")
        });

        assert!(result.is_err());
        assert_eq!(last_state(&store), TransactionState::Committed);
        assert_eq!(store.view()["nested"]["baz"], 321);
        assert_persisted(&path, dry_run, 321);
    });
}

#[test]
fn failure_with_rollback_restores_existing_data() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        let mut store = open_store(&path, dry_run);

        store
            .scoped(|doc| {
                seed(doc);
                Ok::<_, &str>(())
            })
            .unwrap();

        let result = store.scoped(|doc| {
            doc["nested"]["baz"] = json!(321);
            doc.remove("foo");
            Err::<(), _>("boom")
        });

        assert!(result.is_err());
        assert_eq!(last_state(&store), TransactionState::RolledBack);
        assert_eq!(store.view().len(), 2);
        assert_eq!(store.view()["foo"], "bar");
        assert_eq!(store.view()["nested"]["baz"], 123);
        assert_persisted(&path, dry_run, 123);
    });
}

#[test]
fn existing_file_is_visible_inside_scope() {
    for_each_variant(|ext, dry_run| {
        let dir = ScratchDir::new();
        let path = dir.write_file(ext, sample_content(ext));
        let mut store = open_store(&path, dry_run);

        let bar = store
            .scoped(|doc| Ok::<_, &str>(doc["foo"]["bar"].clone()))
            .unwrap();

        assert_eq!(bar, "baz");
    });
}
