//! Property-based tests for the session workflow

use std::sync::Arc;

use proptest::prelude::*;
use replydesk_core::assistant::StaticAssistant;
use replydesk_core::store::{InMemoryTemplateStore, StoreOperation};
use replydesk_core::{SaveOutcome, TemplateFields, TemplateWorkflow, WorkflowError};

// ========== Strategies ==========

/// Strings that are empty or whitespace only
fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\n]{0,4}"
}

fn arb_word() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ]{0,20}"
}

/// Title/text pairs where at least one side is blank
fn arb_blank_draft() -> impl Strategy<Value = (String, String)> {
    prop_oneof![
        (arb_blank(), arb_word()),
        (arb_word(), arb_blank()),
        (arb_blank(), arb_blank()),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to create runtime")
}

fn seeded_store(rows: &[TemplateFields], rt: &tokio::runtime::Runtime) -> Arc<InMemoryTemplateStore> {
    use replydesk_core::store::TemplateStore;

    let store = Arc::new(InMemoryTemplateStore::new());
    rt.block_on(async {
        for row in rows {
            store.create(row).await.unwrap();
        }
    });
    store
}

fn arb_rows() -> impl Strategy<Value = Vec<TemplateFields>> {
    prop::collection::vec(
        (arb_word(), arb_word()).prop_map(|(title, text)| TemplateFields::new(title, text)),
        1..6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Blank drafts are refused without any store call or state change
    #[test]
    fn prop_blank_save_is_local((title, text) in arb_blank_draft(), bound in any::<bool>()) {
        let rt = runtime();
        let store = seeded_store(&[TemplateFields::new("Seed", "Seed text")], &rt);
        let mut workflow = TemplateWorkflow::new(Arc::clone(&store), StaticAssistant::new());
        rt.block_on(workflow.load()).unwrap();
        if bound {
            let id = workflow.state().templates()[0].id.clone();
            workflow.state_mut().select_by_id(&id);
        }
        workflow.state_mut().set_draft_title(title);
        workflow.state_mut().set_draft_text(text);
        let calls_before = store.total_calls();
        let state_before = workflow.state().clone();

        let outcome = rt.block_on(workflow.save()).unwrap();

        prop_assert!(matches!(outcome, SaveOutcome::Rejected(_)));
        prop_assert_eq!(store.total_calls(), calls_before);
        prop_assert_eq!(workflow.state(), &state_before);
    }

    // A failed save leaves list and draft exactly as they were
    #[test]
    fn prop_failed_save_preserves_state(
        rows in arb_rows(),
        title in arb_word(),
        text in arb_word(),
        pick in any::<usize>(),
        bound in any::<bool>(),
    ) {
        let rt = runtime();
        let store = seeded_store(&rows, &rt);
        let mut workflow = TemplateWorkflow::new(Arc::clone(&store), StaticAssistant::new());
        rt.block_on(workflow.load()).unwrap();
        if bound {
            let templates = workflow.state().templates();
            let id = templates[pick % templates.len()].id.clone();
            workflow.state_mut().select_by_id(&id);
        }
        workflow.state_mut().set_draft_title(title);
        workflow.state_mut().set_draft_text(text);
        let templates_before = workflow.state().templates().to_vec();
        let draft_before = workflow.state().draft().clone();

        store.fail_next(StoreOperation::Create, "boom");
        store.fail_next(StoreOperation::Update, "boom");
        let result = rt.block_on(workflow.save());

        prop_assert!(matches!(result, Err(WorkflowError::Save(_))));
        prop_assert_eq!(workflow.state().templates(), templates_before.as_slice());
        prop_assert_eq!(workflow.state().draft(), &draft_before);
        prop_assert!(workflow.state().error().is_some_and(|e| !e.to_string().is_empty()));
    }

    // A failed delete is followed by exactly one list
    #[test]
    fn prop_failed_delete_refreshes_once(rows in arb_rows(), pick in any::<usize>()) {
        let rt = runtime();
        let store = seeded_store(&rows, &rt);
        let mut workflow = TemplateWorkflow::new(Arc::clone(&store), StaticAssistant::new());
        rt.block_on(workflow.load()).unwrap();
        let templates = workflow.state().templates();
        let id = templates[pick % templates.len()].id.clone();
        let lists_before = store.call_count(StoreOperation::List);

        store.fail_next(StoreOperation::Delete, "boom");
        workflow.request_delete(id);
        let result = rt.block_on(workflow.confirm_delete());

        prop_assert!(matches!(result, Err(WorkflowError::Delete(_))));
        prop_assert_eq!(store.call_count(StoreOperation::List), lists_before + 1);
        prop_assert_eq!(workflow.state().templates().len(), rows.len());
    }
}
