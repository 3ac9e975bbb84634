//! Property-based tests for local template search

use chrono::{TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use replydesk_core::{SearchScope, Template, TemplateId, filter_templates};

// ========== Strategies ==========

/// Strategy for generating template titles and bodies
fn arb_text() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 ,.!]{0,40}"
}

/// Strategy for generating a list of templates, newest first
fn arb_templates() -> impl Strategy<Value = Vec<Template>> {
    prop::collection::vec((arb_text(), arb_text()), 0..12).prop_map(|pairs| {
        let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let count = pairs.len();
        pairs
            .into_iter()
            .enumerate()
            .map(|(i, (title, text))| Template {
                id: TemplateId::new(format!("id-{i}")),
                title,
                text,
                created_at: base + TimeDelta::minutes(i64::try_from(count - i).unwrap()),
            })
            .collect()
    })
}

fn arb_scope() -> impl Strategy<Value = SearchScope> {
    prop_oneof![Just(SearchScope::Title), Just(SearchScope::Content)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Every result matches the term, case-insensitively
    #[test]
    fn prop_results_match_term(
        templates in arb_templates(),
        term in "[a-zA-Z]{1,3}",
        scope in arb_scope(),
    ) {
        let needle = term.to_lowercase();
        for t in filter_templates(&templates, &term, scope) {
            let in_title = t.title.to_lowercase().contains(&needle);
            let in_text = t.text.to_lowercase().contains(&needle);
            prop_assert!(in_title || (scope == SearchScope::Content && in_text));
        }
    }

    // Nothing that matches is dropped, and source order is kept
    #[test]
    fn prop_results_are_ordered_subsequence(
        templates in arb_templates(),
        term in "[a-zA-Z]{1,3}",
        scope in arb_scope(),
    ) {
        let needle = term.to_lowercase();
        let expected: Vec<&Template> = templates
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || (scope == SearchScope::Content && t.text.to_lowercase().contains(&needle))
            })
            .collect();
        prop_assert_eq!(filter_templates(&templates, &term, scope), expected);
    }

    // Matching ignores letter case of the term
    #[test]
    fn prop_case_insensitive(templates in arb_templates(), term in "[a-zA-Z]{1,3}") {
        let lower = filter_templates(&templates, &term.to_lowercase(), SearchScope::Title);
        let upper = filter_templates(&templates, &term.to_uppercase(), SearchScope::Title);
        prop_assert_eq!(lower, upper);
    }

    // Content scope never finds less than title scope
    #[test]
    fn prop_content_scope_is_superset(templates in arb_templates(), term in "[a-zA-Z]{1,3}") {
        let by_title = filter_templates(&templates, &term, SearchScope::Title);
        let by_content = filter_templates(&templates, &term, SearchScope::Content);
        prop_assert!(by_title.iter().all(|t| by_content.contains(t)));
    }

    // A blank term shows the whole list
    #[test]
    fn prop_blank_term_matches_all(templates in arb_templates(), spaces in " {0,3}") {
        prop_assert_eq!(filter_templates(&templates, &spaces, SearchScope::Title).len(), templates.len());
    }
}

#[test]
fn test_refund_example() {
    let base = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let templates: Vec<Template> = ["Refund Policy", "Shipping Delay", "Refund Request"]
        .iter()
        .enumerate()
        .map(|(i, title)| Template {
            id: TemplateId::new(i.to_string()),
            title: (*title).to_string(),
            text: String::new(),
            created_at: base,
        })
        .collect();

    let titles: Vec<&str> = filter_templates(&templates, "refund", SearchScope::Title)
        .into_iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Refund Policy", "Refund Request"]);
}
