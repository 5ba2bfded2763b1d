//! Tree inspection: node counting, error collection, debug dumps.

use serde::Serialize;
use tree_sitter::{Node, Tree};

/// Span of a syntax-error or missing node inside a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRange {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl ErrorRange {
    fn from_node(node: Node<'_>) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            start_row: start.row,
            start_col: start.column,
            end_row: end.row,
            end_col: end.column,
        }
    }
}

/// Visit every node in document (preorder) order.
///
/// Cursor-based: traversal depth never grows the call stack, so
/// adversarially nested input cannot overflow it.
pub(crate) fn walk_preorder<'t>(tree: &'t Tree, mut visit: impl FnMut(Node<'t>)) {
    let mut cursor = tree.walk();
    loop {
        visit(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// Total node count, root included.
pub fn count_nodes(tree: &Tree) -> usize {
    let mut count = 0;
    walk_preorder(tree, |_| count += 1);
    count
}

/// Collect every error or missing node, in document order.
///
/// An error node does not stop the walk; its children are visited too.
pub fn collect_errors(tree: &Tree) -> Vec<ErrorRange> {
    let mut errors = Vec::new();
    walk_preorder(tree, |node| {
        if node.is_error() || node.is_missing() {
            errors.push(ErrorRange::from_node(node));
        }
    });
    errors
}

/// Parenthesized structural dump of the tree, for diagnostics and tests.
pub fn debug_sexp(tree: &Tree) -> String {
    tree.root_node().to_sexp()
}
