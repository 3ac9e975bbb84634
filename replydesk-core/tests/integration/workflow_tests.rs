//! Integration tests for the session workflow
//!
//! The workflow runs against the in-memory store, whose call counters act as
//! the spy, and the static assistant.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use replydesk_core::assistant::{AssistantCall, StaticAssistant};
use replydesk_core::models::TemplateValidationError;
use replydesk_core::store::{InMemoryTemplateStore, StoreOperation, TemplateStore};
use replydesk_core::{
    Draft, SaveOutcome, Screenshot, SearchScope, Template, TemplateId, TemplateWorkflow,
    WorkflowError,
};

type Workflow = TemplateWorkflow<Arc<InMemoryTemplateStore>, Arc<StaticAssistant>>;

fn seeded_template(id: &str, title: &str, day: u32) -> Template {
    Template {
        id: TemplateId::from(id),
        title: title.to_string(),
        text: format!("{title} text"),
        created_at: Utc.with_ymd_and_hms(2025, 3, day, 10, 0, 0).unwrap(),
    }
}

fn setup(templates: Vec<Template>) -> (Workflow, Arc<InMemoryTemplateStore>, Arc<StaticAssistant>) {
    let store = Arc::new(InMemoryTemplateStore::with_templates(templates));
    let assistant = Arc::new(StaticAssistant::new());
    let workflow = TemplateWorkflow::new(Arc::clone(&store), Arc::clone(&assistant));
    (workflow, store, assistant)
}

fn three_templates() -> Vec<Template> {
    vec![
        seeded_template("1", "Refund Policy", 1),
        seeded_template("2", "Shipping Delay", 2),
        seeded_template("3", "Refund Request", 3),
    ]
}

#[test]
fn test_load_lists_newest_first() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());

    let count = rt.block_on(workflow.load()).expect("load succeeds");

    assert_eq!(count, 3);
    let ids: Vec<_> = workflow
        .state()
        .templates()
        .iter()
        .map(|t| t.id.as_str().to_string())
        .collect();
    assert_eq!(ids, vec!["3", "2", "1"]);
    assert!(!workflow.state().is_loading());
    assert_eq!(store.call_count(StoreOperation::List), 1);
}

#[test]
fn test_failed_refresh_keeps_previous_list() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    let before = workflow.state().templates().to_vec();

    store.fail_next(StoreOperation::List, "connection reset");
    let err = rt.block_on(workflow.refresh()).expect_err("refresh fails");

    assert!(matches!(err, WorkflowError::Fetch(_)));
    assert_eq!(workflow.state().templates(), before.as_slice());
    assert_eq!(workflow.state().error(), Some(&err));
    assert!(!workflow.state().is_loading());
}

#[test]
fn test_create_appears_first_and_clears_draft() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");

    workflow.state_mut().set_draft_title("T");
    workflow.state_mut().set_draft_text("X");
    let outcome = rt.block_on(workflow.save()).expect("save succeeds");

    let SaveOutcome::Created(created) = outcome else {
        panic!("expected a create, got {outcome:?}");
    };
    let first = &workflow.state().templates()[0];
    assert_eq!(first.id, created.id);
    assert_eq!((first.title.as_str(), first.text.as_str()), ("T", "X"));
    assert!(!["1", "2", "3"].contains(&created.id.as_str()));
    assert_eq!(workflow.state().draft(), &Draft::default());
    assert_eq!(store.call_count(StoreOperation::Create), 1);
    assert_eq!(store.call_count(StoreOperation::List), 2);
}

#[test]
fn test_update_keeps_identity_and_draft() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    let original = workflow
        .state()
        .template(&TemplateId::from("2"))
        .cloned()
        .expect("template 2 loaded");

    assert!(workflow.state_mut().select_by_id(&original.id));
    workflow.state_mut().set_draft_title("T2");
    workflow.state_mut().set_draft_text("X2");
    let outcome = rt.block_on(workflow.save()).expect("save succeeds");
    assert!(matches!(outcome, SaveOutcome::Updated(_)));

    let updated = workflow
        .state()
        .template(&original.id)
        .expect("template 2 still listed");
    assert_eq!(updated.title, "T2");
    assert_eq!(updated.text, "X2");
    assert_eq!(updated.created_at, original.created_at);
    assert_eq!(workflow.state().draft().editing_id, Some(original.id.clone()));
    assert_eq!(store.call_count(StoreOperation::Update), 1);
    assert_eq!(store.call_count(StoreOperation::List), 2);
}

#[test]
fn test_blank_drafts_never_reach_the_store() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let cases = [("", "body"), ("Title", "  "), ("", "")];

    for (title, text) in cases {
        let (mut workflow, store, _) = setup(Vec::new());
        workflow.state_mut().set_draft_title(title);
        workflow.state_mut().set_draft_text(text);
        let before = workflow.state().clone();

        let outcome = rt.block_on(workflow.save()).expect("rejection is not an error");

        assert!(matches!(outcome, SaveOutcome::Rejected(_)));
        assert_eq!(store.total_calls(), 0, "store called for {title:?}/{text:?}");
        assert_eq!(workflow.state(), &before);
    }
}

#[test]
fn test_blank_title_reported_before_blank_text() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, _) = setup(Vec::new());
    let outcome = rt.block_on(workflow.save()).expect("rejection is not an error");
    assert_eq!(
        outcome,
        SaveOutcome::Rejected(TemplateValidationError::BlankTitle)
    );
}

#[test]
fn test_failed_save_leaves_state_untouched() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    workflow.state_mut().select_by_id(&TemplateId::from("1"));
    workflow.state_mut().set_draft_text("Changed body");
    let templates_before = workflow.state().templates().to_vec();
    let draft_before = workflow.state().draft().clone();

    store.fail_next(StoreOperation::Update, "timeout");
    let err = rt.block_on(workflow.save()).expect_err("save fails");

    assert!(matches!(err, WorkflowError::Save(_)));
    assert!(!err.to_string().is_empty());
    assert_eq!(workflow.state().templates(), templates_before.as_slice());
    assert_eq!(workflow.state().draft(), &draft_before);
    assert_eq!(workflow.state().error(), Some(&err));
    assert_eq!(store.call_count(StoreOperation::List), 1, "no refresh after a failed save");
}

#[test]
fn test_create_survives_failed_refresh() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(Vec::new());
    workflow.state_mut().set_draft_title("Greeting");
    workflow.state_mut().set_draft_text("Hello!");

    store.fail_next(StoreOperation::List, "offline");
    let outcome = rt.block_on(workflow.save()).expect("save itself succeeds");

    assert!(matches!(outcome, SaveOutcome::Created(_)));
    assert_eq!(workflow.state().draft(), &Draft::default());
    assert!(matches!(workflow.state().error(), Some(WorkflowError::Fetch(_))));
    assert!(workflow.state().templates().is_empty());
    assert_eq!(store.snapshot().len(), 1);
}

#[test]
fn test_confirmed_delete_removes_locally_without_refetch() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");

    workflow.request_delete(TemplateId::from("2"));
    let deleted = rt.block_on(workflow.confirm_delete()).expect("delete succeeds");

    assert_eq!(deleted, Some(TemplateId::from("2")));
    assert!(workflow.state().template(&TemplateId::from("2")).is_none());
    assert_eq!(workflow.state().templates().len(), 2);
    assert_eq!(store.call_count(StoreOperation::List), 1);

    let remaining = rt.block_on(store.list()).expect("list");
    assert!(remaining.iter().all(|t| t.id.as_str() != "2"));
}

#[test]
fn test_cancelled_delete_never_calls_store() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");

    workflow.request_delete(TemplateId::from("1"));
    workflow.cancel_delete();
    let deleted = rt.block_on(workflow.confirm_delete()).expect("nothing to do");

    assert_eq!(deleted, None);
    assert_eq!(store.call_count(StoreOperation::Delete), 0);
    assert_eq!(workflow.state().templates().len(), 3);
}

#[test]
fn test_failed_delete_triggers_exactly_one_refresh() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    let lists_before = store.call_count(StoreOperation::List);

    store.fail_next(StoreOperation::Delete, "permission denied");
    workflow.request_delete(TemplateId::from("3"));
    let err = rt.block_on(workflow.confirm_delete()).expect_err("delete fails");

    assert!(matches!(err, WorkflowError::Delete(_)));
    assert_eq!(store.call_count(StoreOperation::List), lists_before + 1);
    assert_eq!(workflow.state().templates().len(), 3);
    assert_eq!(workflow.state().error(), Some(&err));
}

#[test]
fn test_second_delete_of_same_id_is_not_an_error() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");

    for _ in 0..2 {
        workflow.request_delete(TemplateId::from("1"));
        rt.block_on(workflow.confirm_delete())
            .expect("delete is idempotent");
    }
    assert_eq!(workflow.state().templates().len(), 2);
}

#[test]
fn test_search_filters_without_touching_store() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    let calls = store.total_calls();

    workflow.state_mut().set_search("refund");
    let titles: Vec<_> = workflow
        .state()
        .visible_templates()
        .iter()
        .map(|t| t.title.clone())
        .collect();

    assert_eq!(titles, vec!["Refund Request", "Refund Policy"]);
    assert_eq!(workflow.state().templates().len(), 3);
    assert_eq!(store.total_calls(), calls);
}

#[test]
fn test_content_scope_searches_body() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let store = Arc::new(InMemoryTemplateStore::with_templates(three_templates()));
    let mut workflow = TemplateWorkflow::new(Arc::clone(&store), StaticAssistant::new())
        .with_search_scope(SearchScope::Content);
    rt.block_on(workflow.load()).expect("load succeeds");

    workflow.state_mut().set_search("DELAY TEXT");
    assert_eq!(workflow.state().visible_templates().len(), 1);
}

#[test]
fn test_enhance_and_generate_fill_the_draft() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, store, assistant) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");
    workflow.state_mut().select_by_id(&TemplateId::from("1"));

    rt.block_on(workflow.generate_draft("late refunds"))
        .expect("generate succeeds");
    assert_eq!(workflow.state().draft().title, "late refunds");
    assert_eq!(workflow.state().draft().editing_id, Some(TemplateId::from("1")));

    assert!(rt.block_on(workflow.enhance_draft()).expect("enhance succeeds"));
    assert!(workflow.state().draft().text.starts_with("Enhanced: "));

    assert_eq!(
        assistant.calls(),
        vec![
            AssistantCall::Generate("late refunds".to_string()),
            AssistantCall::Rewrite("Thank you for reaching out about late refunds.".to_string()),
        ]
    );
    assert_eq!(store.call_count(StoreOperation::List), 1);
}

#[test]
fn test_enhance_with_blank_text_is_skipped() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, assistant) = setup(Vec::new());
    workflow.state_mut().set_draft_text("   ");

    assert!(!rt.block_on(workflow.enhance_draft()).expect("skip is not an error"));
    assert!(assistant.calls().is_empty());
}

#[test]
fn test_assistant_failures_leave_draft_and_store_errors_alone() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, assistant) = setup(Vec::new());
    workflow.state_mut().set_draft_title("Title");
    workflow.state_mut().set_draft_text("thanks");
    let draft_before = workflow.state().draft().clone();

    assistant.fail_next("quota exceeded");
    let err = rt.block_on(workflow.enhance_draft()).expect_err("enhance fails");
    assert!(matches!(err, WorkflowError::Enhance(_)));
    assert!(err.to_string().starts_with("Failed to enhance text with AI"));
    assert_eq!(workflow.state().draft(), &draft_before);
    assert!(!workflow.state().is_enhancing());

    assistant.fail_next("quota exceeded");
    let err = rt
        .block_on(workflow.generate_draft("refunds"))
        .expect_err("generate fails");
    assert!(matches!(err, WorkflowError::Generate(_)));
    assert_eq!(workflow.state().draft(), &draft_before);
    assert_eq!(workflow.state().assist_error(), Some(&err));
    assert!(workflow.state().error().is_none());
}

#[test]
fn test_suggest_and_ask() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, assistant) = setup(Vec::new());
    let screenshot = Screenshot::new("image/png", vec![1, 2, 3]);

    let reply = rt
        .block_on(workflow.suggest_reply(&screenshot, "order #1001"))
        .expect("suggest succeeds");
    assert!(reply.contains("order #1001"));

    let answer = rt
        .block_on(workflow.ask("How long do refunds take?"))
        .expect("ask succeeds");
    assert_eq!(answer, "Answer: How long do refunds take?");

    assistant.fail_next("down");
    let err = rt
        .block_on(workflow.suggest_reply(&screenshot, ""))
        .expect_err("suggest fails");
    assert!(err.to_string().starts_with("Failed to get AI suggestion"));
}

#[test]
fn test_copy_text_returns_loaded_body() {
    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let (mut workflow, _, _) = setup(three_templates());
    rt.block_on(workflow.load()).expect("load succeeds");

    assert_eq!(
        workflow.copy_text(&TemplateId::from("2")),
        Some("Shipping Delay text")
    );
    assert_eq!(workflow.copy_text(&TemplateId::from("missing")), None);
}
