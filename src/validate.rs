//! Stateless one-shot syntax checking.
//!
//! No session required: the source is parsed, error and missing nodes are
//! reported with their spans and the offending source line, and the tree
//! is dropped.

use serde::Serialize;

use crate::inspect;
use crate::parser::GrammarParser;

/// One syntax problem found in checked source.
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxIssue {
    /// `"ERROR"` for error nodes; the expected kind for missing nodes.
    pub node_kind: String,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
    /// The full source line the issue starts on.
    pub context: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub error_count: usize,
    pub errors: Vec<SyntaxIssue>,
}

pub(crate) fn check_source(parser: &mut GrammarParser, source: &str) -> ValidationReport {
    let Ok(tree) = parser.parse(source) else {
        return ValidationReport {
            valid: false,
            error_count: 0,
            errors: Vec::new(),
        };
    };

    let has_error = tree.root_node().has_error();
    let mut errors = Vec::new();
    if has_error {
        let lines: Vec<&str> = source.split('\n').collect();
        inspect::walk_preorder(&tree, |node| {
            if node.is_error() || node.is_missing() {
                let start = node.start_position();
                let end = node.end_position();
                errors.push(SyntaxIssue {
                    node_kind: node.kind().to_string(),
                    start_row: start.row,
                    start_col: start.column,
                    end_row: end.row,
                    end_col: end.column,
                    context: lines.get(start.row).copied().unwrap_or("").to_string(),
                });
            }
        });
    }

    ValidationReport {
        valid: !has_error,
        error_count: errors.len(),
        errors,
    }
}
