use serde::{Deserialize, Serialize};

use crate::edit::byte::ByteEdit;
use crate::edit::errors::EditError;
use crate::session::Session;

/// A snippet-based edit: replace the unique occurrence of `old_text`,
/// optionally requiring an enclosing node of a given kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeEdit {
    pub old_text: String,
    pub new_text: String,
    /// When set, the match must sit inside a node of this syntactic kind
    /// (the covering node itself or any of its ancestors).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_kind: Option<String>,
}

/// Knobs for [`crate::SessionStore::apply_node_edits`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeEditOptions {
    /// Preview only; the session keeps its current buffer/tree pair.
    #[serde(default)]
    pub dry_run: bool,
    /// Carry the match line's indentation into multi-line replacements.
    #[serde(default = "default_true")]
    pub auto_indent: bool,
    /// Reject the whole batch if the result would contain parse errors.
    #[serde(default)]
    pub fail_on_parse_error: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NodeEditOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            auto_indent: true,
            fail_on_parse_error: false,
        }
    }
}

struct ResolvedMatch {
    index: usize,
    start_byte: usize,
    end_byte: usize,
}

/// Resolve snippet edits against the session's *current* buffer into
/// byte-range edits.
///
/// Every snippet is located in the pre-edit text; resolution never sees
/// another edit's replacement. Overlapping match spans abort the batch.
pub(crate) fn resolve(
    session: &Session,
    edits: &[NodeEdit],
    auto_indent: bool,
) -> Result<Vec<ByteEdit>, EditError> {
    let source = session.text();
    let mut matches = Vec::with_capacity(edits.len());

    for (index, edit) in edits.iter().enumerate() {
        if edit.old_text.is_empty() {
            return Err(EditError::EmptySnippet { index });
        }

        let (first, count) = find_occurrences(source, &edit.old_text);
        let start_byte = first.ok_or(EditError::SnippetNotFound { index })?;
        if count > 1 {
            return Err(EditError::AmbiguousSnippet { index, count });
        }
        let end_byte = start_byte + edit.old_text.len();

        if let Some(expected) = edit.expected_kind.as_deref() {
            check_enclosing_kind(session, start_byte, end_byte, expected).map_err(|actual| {
                EditError::KindMismatch {
                    index,
                    expected: expected.to_string(),
                    actual,
                }
            })?;
        }

        matches.push(ResolvedMatch {
            index,
            start_byte,
            end_byte,
        });
    }

    // every pair, not just neighbors: match order is input order, which
    // is not sorted
    for i in 0..matches.len() {
        for j in (i + 1)..matches.len() {
            let (a, b) = (&matches[i], &matches[j]);
            if a.start_byte < b.end_byte && b.start_byte < a.end_byte {
                return Err(EditError::OverlappingMatches {
                    first_index: a.index,
                    second_index: b.index,
                });
            }
        }
    }

    Ok(matches
        .into_iter()
        .map(|m| {
            let replacement = &edits[m.index].new_text;
            let new_text = if auto_indent {
                reindent(source, m.start_byte, replacement)
            } else {
                replacement.clone()
            };
            ByteEdit {
                start_byte: m.start_byte,
                end_byte: m.end_byte,
                new_text,
            }
        })
        .collect())
}

/// First match position and total occurrence count of `needle`.
///
/// The search resumes one character past each match start, so overlapping
/// occurrences count separately ("aa" occurs twice in "aaa").
fn find_occurrences(haystack: &str, needle: &str) -> (Option<usize>, usize) {
    let mut first = None;
    let mut count = 0;
    let mut from = 0;

    while let Some(rel) = haystack[from..].find(needle) {
        let at = from + rel;
        if first.is_none() {
            first = Some(at);
        }
        count += 1;
        let step = haystack[at..].chars().next().map_or(1, char::len_utf8);
        from = at + step;
    }

    (first, count)
}

/// Walk from the smallest node covering `start_byte..end_byte` up through
/// its ancestors, looking for `expected`. Errs with the covering node's
/// actual kind.
fn check_enclosing_kind(
    session: &Session,
    start_byte: usize,
    end_byte: usize,
    expected: &str,
) -> Result<(), String> {
    let root = session.tree().root_node();
    let covering = root
        .descendant_for_byte_range(start_byte, end_byte.saturating_sub(1))
        .unwrap_or(root);

    let mut current = Some(covering);
    while let Some(node) = current {
        if node.kind() == expected {
            return Ok(());
        }
        current = node.parent();
    }

    Err(covering.kind().to_string())
}

/// Re-indent a replacement so it keeps the block position of the text it
/// replaces: when the match line is indented and the replacement's first
/// line starts at column 0, every following non-empty line gets the match
/// line's leading whitespace. The first line is left alone — it lands at
/// the match column.
fn reindent(source: &str, match_start: usize, new_text: &str) -> String {
    let line_start = source[..match_start].rfind('\n').map_or(0, |pos| pos + 1);
    let indent: String = source[line_start..]
        .chars()
        .take_while(|c| *c == ' ' || *c == '\t')
        .collect();
    if indent.is_empty() {
        return new_text.to_string();
    }

    let first_line = new_text.split('\n').next().unwrap_or("");
    if first_line.starts_with(' ') || first_line.starts_with('\t') {
        return new_text.to_string();
    }

    let mut out = String::with_capacity(new_text.len() + indent.len() * 4);
    for (i, line) in new_text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
            }
        }
        out.push_str(line);
    }
    out
}
