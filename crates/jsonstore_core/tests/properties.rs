//! Property tests and end-to-end scenarios.

use jsonstore_core::{json, Store, StoreConfig, TransactionState};
use jsonstore_testkit::prelude::*;
use proptest::prelude::*;
use std::fs;

proptest! {
    #![proptest_config(PropTestConfig::quick().to_proptest_config())]

    #[test]
    fn committed_document_reloads_equal(
        doc in document_strategy(),
        ext in prop::sample::select(vec!["json", "yaml", "yml", "cbor"]),
    ) {
        let dir = ScratchDir::new();
        let path = dir.file(ext);

        let mut store = Store::load(&path).unwrap();
        *store.content_mut() = doc.clone();
        store.commit().unwrap();

        prop_assert_eq!(reload(&path).into_content(), doc);
    }

    #[test]
    fn rollback_restores_snapshot(
        initial in document_strategy(),
        mutations in mutation_sequence_strategy(0, 12),
    ) {
        let dir = ScratchDir::new();
        let mut store = Store::load(dir.file("json")).unwrap();
        *store.content_mut() = initial.clone();

        let txn = store.open_transaction(true);
        apply_all(store.content_mut(), &mutations);
        txn.rollback(&mut store);

        prop_assert_eq!(store.view(), &initial);
    }

    #[test]
    fn resolved_transaction_cannot_be_resolved_again(
        first_commits in any::<bool>(),
        second_commits in any::<bool>(),
        through_store in any::<bool>(),
    ) {
        let dir = ScratchDir::new();
        let mut store = Store::load(dir.file("yaml")).unwrap();

        let txn = store.open_transaction(true);
        store.content_mut().insert("foo".into(), json!("bar"));
        if first_commits {
            txn.commit(&mut store).unwrap();
        } else {
            txn.rollback(&mut store);
        }
        let settled = txn.state();

        if second_commits && through_store {
            // Nothing is pending any more, so this is a direct write.
            prop_assert!(store.commit().is_ok());
        } else {
            let again = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                match (second_commits, through_store) {
                    (true, _) => {
                        let _ = txn.commit(&mut store);
                    }
                    (false, false) => {
                        txn.rollback(&mut store);
                    }
                    (false, true) => {
                        store.rollback();
                    }
                }
            }));
            prop_assert!(again.is_err());
        }
        prop_assert_eq!(txn.state(), settled);
    }

    #[test]
    fn dry_run_never_modifies_the_file(
        mutations in mutation_sequence_strategy(1, 8),
        ext in prop::sample::select(vec!["json", "yaml", "yml"]),
    ) {
        let dir = ScratchDir::new();
        let path = dir.write_file(ext, sample_content(ext));
        let before = fs::read(&path).unwrap();

        let mut store = open_store(&path, true);
        for mutation in &mutations {
            let txn = store.open_transaction(true);
            mutation.apply(store.content_mut());
            txn.commit(&mut store).unwrap();
            store.commit().unwrap();
        }

        prop_assert_eq!(fs::read(&path).unwrap(), before);
        prop_assert_eq!(reload(&path).view()["foo"]["bar"].clone(), json!("baz"));
    }

    #[test]
    fn scoped_failure_policy(
        initial in document_strategy(),
        mutations in mutation_sequence_strategy(1, 8),
        allow_rollback in any::<bool>(),
    ) {
        let dir = ScratchDir::new();
        let path = dir.file("json");
        let mut store = Store::load(&path).unwrap();
        *store.content_mut() = initial.clone();
        store.commit().unwrap();

        let mut edited = initial.clone();
        apply_all(&mut edited, &mutations);

        let result = store.transaction(allow_rollback, |doc| {
            apply_all(doc, &mutations);
            Err::<(), _>("boom")
        });
        prop_assert!(result.is_err());

        let expected = if allow_rollback { &initial } else { &edited };
        prop_assert_eq!(store.view(), expected);
        prop_assert_eq!(&reload(&path).into_content(), expected);
    }
}

#[test]
fn commit_then_failed_scope_keeps_last_commit() {
    init_tracing();
    for ext in TEXT_EXTENSIONS {
        let dir = ScratchDir::new();
        let path = dir.file(ext);
        assert!(!path.exists());

        let mut store = Store::load(&path).unwrap();
        store.content_mut().insert("foo".into(), json!("bar"));
        assert_eq!(store.commit().unwrap(), TransactionState::Committed);
        assert_eq!(reload(&path).into_content(), store.view().clone());

        let result = store.scoped(|doc| {
            doc["foo"] = json!("baz");
            Err::<(), _>("failure before scope exit")
        });

        assert!(result.is_err());
        assert_eq!(store.view()["foo"], "bar");
        let reloaded = reload(&path);
        assert_eq!(reloaded.view().len(), 1);
        assert_eq!(reloaded.view()["foo"], "bar");
    }
}

#[test]
fn dry_run_commit_writes_nothing() {
    for ext in TEXT_EXTENSIONS {
        let dir = ScratchDir::new();
        let path = dir.file(ext);

        let mut store =
            Store::load_with_config(&path, StoreConfig::new().dry_run(true)).unwrap();
        store.content_mut().insert("foo".into(), json!("bar"));
        store
            .content_mut()
            .insert("nested".into(), json!({"baz": [1, 2, 3]}));
        assert_eq!(store.commit().unwrap(), TransactionState::Committed);

        assert!(!path.exists());
        assert!(reload(&path).view().is_empty());
    }
}

#[test]
fn view_leaves_slot_alone() {
    let dir = ScratchDir::new();
    let mut store = Store::load(dir.file("yml")).unwrap();

    let txn = store.open_transaction(true);
    store.content_mut().insert("foo".into(), json!("bar"));
    assert_eq!(store.view()["foo"], "bar");

    let slot = store.active_transaction().unwrap();
    assert!(slot.ptr_eq(&txn));
    assert!(slot.is_pending());
}
