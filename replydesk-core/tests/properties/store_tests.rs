//! Property-based tests for the template store contract
//!
//! Exercised against the in-memory store, which the workflow tests rely on
//! to behave like the remote table.

use proptest::prelude::*;
use replydesk_core::store::{InMemoryTemplateStore, TemplateStore};
use replydesk_core::{TemplateFields, TemplateId};

// ========== Strategies ==========

fn arb_fields() -> impl Strategy<Value = TemplateFields> {
    ("[A-Za-z][A-Za-z0-9 ]{0,20}", "[A-Za-z][A-Za-z0-9 .!]{0,60}")
        .prop_map(|(title, text)| TemplateFields::new(title, text))
}

/// A store operation; indices pick an existing row modulo the row count
#[derive(Debug, Clone)]
enum Op {
    Create(TemplateFields),
    Update(usize, TemplateFields),
    Delete(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => arb_fields().prop_map(Op::Create),
        2 => (any::<usize>(), arb_fields()).prop_map(|(i, f)| Op::Update(i, f)),
        1 => any::<usize>().prop_map(Op::Delete),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to create runtime")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Every successful list is sorted newest first
    #[test]
    fn prop_list_sorted_descending(ops in prop::collection::vec(arb_op(), 0..20)) {
        let rt = runtime();
        let store = InMemoryTemplateStore::new();
        rt.block_on(async {
            for op in ops {
                let rows = store.list().await.unwrap();
                match op {
                    Op::Create(fields) => {
                        store.create(&fields).await.unwrap();
                    }
                    Op::Update(i, fields) if !rows.is_empty() => {
                        store.update(&rows[i % rows.len()].id, &fields).await.unwrap();
                    }
                    Op::Delete(i) if !rows.is_empty() => {
                        store.delete(&rows[i % rows.len()].id).await.unwrap();
                    }
                    _ => {}
                }
            }
        });

        let listed = rt.block_on(store.list()).unwrap();
        prop_assert!(listed.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }

    // A new record comes back with its fields, a fresh id, and lists first
    #[test]
    fn prop_create_lists_first(
        existing in prop::collection::vec(arb_fields(), 0..5),
        fields in arb_fields(),
    ) {
        let rt = runtime();
        let store = InMemoryTemplateStore::new();
        let (created, listed, earlier_ids) = rt.block_on(async {
            let mut ids = Vec::new();
            for f in &existing {
                ids.push(store.create(f).await.unwrap().id);
            }
            let created = store.create(&fields).await.unwrap();
            (created, store.list().await.unwrap(), ids)
        });

        prop_assert_eq!(&created.title, &fields.title);
        prop_assert_eq!(&created.text, &fields.text);
        prop_assert!(!earlier_ids.contains(&created.id));
        prop_assert_eq!(&listed[0], &created);
    }

    // Update changes title and text only
    #[test]
    fn prop_update_keeps_identity(original in arb_fields(), replacement in arb_fields()) {
        let rt = runtime();
        let store = InMemoryTemplateStore::new();
        let (before, after) = rt.block_on(async {
            let before = store.create(&original).await.unwrap();
            store.update(&before.id, &replacement).await.unwrap();
            let listed = store.list().await.unwrap();
            (before, listed.into_iter().next().unwrap())
        });

        prop_assert_eq!(&after.id, &before.id);
        prop_assert_eq!(after.created_at, before.created_at);
        prop_assert_eq!(after.fields(), replacement);
    }

    // Deleted rows disappear and deleting again is not an error
    #[test]
    fn prop_delete_is_idempotent(rows in prop::collection::vec(arb_fields(), 1..6), pick in any::<usize>()) {
        let rt = runtime();
        let store = InMemoryTemplateStore::new();
        let (victim, listed, second) = rt.block_on(async {
            let mut created = Vec::new();
            for f in &rows {
                created.push(store.create(f).await.unwrap());
            }
            let victim = created[pick % created.len()].id.clone();
            store.delete(&victim).await.unwrap();
            let listed = store.list().await.unwrap();
            let second = store.delete(&victim).await;
            (victim, listed, second)
        });

        prop_assert!(listed.iter().all(|t| t.id != victim));
        prop_assert_eq!(listed.len(), rows.len() - 1);
        prop_assert!(second.is_ok());
    }
}

#[test]
fn test_update_unknown_id_fails() {
    let rt = runtime();
    let store = InMemoryTemplateStore::new();
    let result = rt.block_on(store.update(&TemplateId::from("missing"), &TemplateFields::new("T", "X")));
    assert!(result.is_err());
}
