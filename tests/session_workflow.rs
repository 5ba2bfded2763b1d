//! End-to-end session workflow test
//!
//! Exercises the complete flow:
//! 1. Open a file into the store
//! 2. Query it structurally
//! 3. Edit it by snippet and render the diff
//! 4. Replace its content wholesale
//! 5. Close it

use ast_session::lang::SupportLang;
use ast_session::{unified_diff, NodeEdit, NodeEditOptions, SessionStore};

const SOURCE: &str = "\
fn greet(name: &str) {
    println!(\"hello {name}\");
}

fn main() {
    greet(\"world\");
}
";

#[test]
fn open_query_edit_diff_update_close() {
    let mut store = SessionStore::new(SupportLang::Rust).unwrap();

    // 1. Open
    let report = store.open("greet.rs", SOURCE).unwrap();
    assert!(!report.has_error);
    assert!(store.is_open("greet.rs"));

    // 2. Query
    let matches = store
        .run_query("greet.rs", "(function_item name: (identifier) @name)")
        .unwrap();
    let names: Vec<_> = matches
        .iter()
        .map(|m| m.captures[0].text.as_str())
        .collect();
    assert_eq!(names, vec!["greet", "main"]);

    // 3. Edit by snippet, constrained to the enclosing function
    let before = store.source("greet.rs").unwrap().to_string();
    let report = store
        .apply_node_edits(
            "greet.rs",
            &[NodeEdit {
                old_text: "greet(\"world\");".to_string(),
                new_text: "greet(\"there\");".to_string(),
                expected_kind: Some("function_item".to_string()),
            }],
            &NodeEditOptions {
                fail_on_parse_error: true,
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!report.has_error);

    let diff = unified_diff(&before, &report.new_source, "greet.rs");
    assert!(diff.starts_with("--- a/greet.rs\n+++ b/greet.rs\n"));
    assert!(diff.contains("-    greet(\"world\");"));
    assert!(diff.contains("+    greet(\"there\");"));

    // 4. Update wholesale
    let report = store.update("greet.rs", "fn main() {}\n").unwrap();
    assert!(!report.has_error);
    assert_eq!(store.source("greet.rs").unwrap(), "fn main() {}\n");

    // 5. Close
    assert!(store.close("greet.rs"));
    assert!(!store.is_open("greet.rs"));
    assert!(store.open_ids().is_empty());
}

#[test]
fn several_sessions_are_independent() {
    let mut store = SessionStore::new(SupportLang::Rust).unwrap();
    store.open("a.rs", "fn a() {}").unwrap();
    store.open("b.rs", "fn b() {}").unwrap();

    store
        .apply_node_edits(
            "a.rs",
            &[NodeEdit {
                old_text: "fn a".to_string(),
                new_text: "fn alpha".to_string(),
                expected_kind: None,
            }],
            &NodeEditOptions::default(),
        )
        .unwrap();

    assert_eq!(store.source("a.rs").unwrap(), "fn alpha() {}");
    assert_eq!(store.source("b.rs").unwrap(), "fn b() {}");

    let mut ids = store.open_ids();
    ids.sort_unstable();
    assert_eq!(ids, vec!["a.rs", "b.rs"]);
}

/// Snippet lookups all resolve against the buffer as it existed before
/// the batch; one edit's replacement text never confuses another edit's
/// search, even when they overlap textually.
#[test]
fn batch_snippets_resolve_against_pre_edit_buffer() {
    let mut store = SessionStore::new(SupportLang::Rust).unwrap();
    store
        .open("x.rs", "fn main() { alpha(); beta(); }")
        .unwrap();

    let report = store
        .apply_node_edits(
            "x.rs",
            &[
                NodeEdit {
                    // introduces the text "beta2", which contains the
                    // second edit's snippet "beta"
                    old_text: "alpha()".to_string(),
                    new_text: "beta2()".to_string(),
                    expected_kind: None,
                },
                NodeEdit {
                    old_text: "beta()".to_string(),
                    new_text: "gamma()".to_string(),
                    expected_kind: None,
                },
            ],
            &NodeEditOptions::default(),
        )
        .unwrap();

    assert_eq!(report.new_source, "fn main() { beta2(); gamma(); }");
}

#[test]
fn query_matches_track_the_current_buffer() {
    let mut store = SessionStore::new(SupportLang::Rust).unwrap();
    store.open("x.rs", "fn one() {}").unwrap();
    store.update("x.rs", "fn two() {}\nfn three() {}").unwrap();

    let matches = store
        .run_query("x.rs", "(function_item name: (identifier) @name)")
        .unwrap();
    let names: Vec<_> = matches
        .iter()
        .map(|m| m.captures[0].text.as_str())
        .collect();
    assert_eq!(names, vec!["two", "three"]);
}
