//! Property tests for the byte-edit applier and the diff renderer.

use ast_session::lang::SupportLang;
use ast_session::{unified_diff, ByteEdit, SessionStore};
use proptest::prelude::*;

/// Re-derive the post-edit buffer independently of the applier: sort the
/// edits and splice rightmost-first.
fn replay(source: &str, edits: &[ByteEdit]) -> String {
    let mut ordered: Vec<&ByteEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| e.start_byte);

    let mut bytes = source.as_bytes().to_vec();
    for edit in ordered.iter().rev() {
        bytes.splice(edit.start_byte..edit.end_byte, edit.new_text.bytes());
    }
    String::from_utf8(bytes).expect("ascii edits keep the buffer valid")
}

/// Clamp raw (position, width, text) triples into a sorted batch of
/// non-overlapping edits over a `len`-byte ascii buffer.
fn disjoint_edits(len: usize, raw: Vec<(usize, usize, String)>) -> Vec<ByteEdit> {
    let mut candidates: Vec<(usize, usize, String)> = raw
        .into_iter()
        .map(|(pos, width, text)| {
            let start = pos.min(len);
            let end = (start + width).min(len);
            (start, end, text)
        })
        .collect();
    candidates.sort_by_key(|c| c.0);

    let mut edits = Vec::new();
    let mut prev_end = 0;
    for (start, end, text) in candidates {
        if start < prev_end {
            continue;
        }
        prev_end = end;
        edits.push(ByteEdit {
            start_byte: start,
            end_byte: end,
            new_text: text,
        });
    }
    edits
}

proptest! {
    #[test]
    fn applier_matches_independent_replay(
        source in "[a-z (){};\n]{0,120}",
        raw in prop::collection::vec((0usize..140, 0usize..10, "[a-z;]{0,8}"), 0..6),
    ) {
        let edits = disjoint_edits(source.len(), raw);

        let mut store = SessionStore::new(SupportLang::Rust).unwrap();
        store.open("prop.rs", source.as_str()).unwrap();

        let expected = replay(&source, &edits);
        let report = store.apply_byte_edits("prop.rs", &edits, false).unwrap();

        prop_assert_eq!(&report.new_source, &expected);
        prop_assert_eq!(report.edits_applied, edits.len());
        prop_assert_eq!(store.source("prop.rs").unwrap(), expected.as_str());
    }

    #[test]
    fn dry_run_never_mutates(
        source in "[a-z (){};\n]{0,120}",
        raw in prop::collection::vec((0usize..140, 0usize..10, "[a-z;]{0,8}"), 0..6),
    ) {
        let edits = disjoint_edits(source.len(), raw);

        let mut store = SessionStore::new(SupportLang::Rust).unwrap();
        store.open("prop.rs", source.as_str()).unwrap();

        let report = store.apply_byte_edits("prop.rs", &edits, true).unwrap();

        prop_assert_eq!(report.new_source, replay(&source, &edits));
        prop_assert_eq!(store.source("prop.rs").unwrap(), source.as_str());
    }

    #[test]
    fn diff_of_identical_text_is_empty(text in "\\PC{0,200}") {
        prop_assert_eq!(unified_diff(&text, &text, "same.txt"), "");
    }

    #[test]
    fn diff_is_nonempty_when_lines_differ(
        old in "[a-z]{1,20}\n",
        new in "[A-Z]{1,20}\n",
    ) {
        let diff = unified_diff(&old, &new, "f.txt");
        prop_assert!(diff.starts_with("--- a/f.txt\n+++ b/f.txt\n"));
    }
}
