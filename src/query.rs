//! Structural queries over a session's tree.
//!
//! Patterns use tree-sitter's S-expression query syntax:
//!
//! ```text
//! (function_item
//!   name: (identifier) @func_name
//!   body: (block) @body)
//! ```
//!
//! Captures are prefixed with `@`. Matches come back in the engine's
//! natural traversal order over the tree, and that order is preserved.

use ast_grep_language::{LanguageExt, SupportLang};
use serde::Serialize;
use thiserror::Error;
use tree_sitter::{Query, QueryCursor, StreamingIterator};

use crate::session::{Session, SessionError};

/// One named sub-node binding inside a match.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureRecord {
    pub name: String,
    pub node_kind: String,
    pub text: String,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

/// One query match: which pattern fired, and its captures in query order.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub pattern_index: usize,
    pub captures: Vec<CaptureRecord>,
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("query error at offset {offset}: invalid syntax")]
    Syntax { offset: usize },

    #[error("query error at offset {offset}: invalid node type")]
    NodeType { offset: usize },

    #[error("query error at offset {offset}: invalid field name")]
    FieldName { offset: usize },

    #[error("query error at offset {offset}: invalid capture name")]
    CaptureName { offset: usize },

    #[error("query error at offset {offset}: invalid predicate")]
    Predicate { offset: usize },

    #[error("query error at offset {offset}: impossible pattern structure")]
    Structure { offset: usize },

    #[error("query language does not match the session grammar")]
    Language,

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl QueryError {
    fn from_compile(err: tree_sitter::QueryError) -> Self {
        use tree_sitter::QueryErrorKind;
        let offset = err.offset;
        match err.kind {
            QueryErrorKind::Syntax => QueryError::Syntax { offset },
            QueryErrorKind::NodeType => QueryError::NodeType { offset },
            QueryErrorKind::Field => QueryError::FieldName { offset },
            QueryErrorKind::Capture => QueryError::CaptureName { offset },
            QueryErrorKind::Predicate => QueryError::Predicate { offset },
            QueryErrorKind::Structure => QueryError::Structure { offset },
            QueryErrorKind::Language => QueryError::Language,
        }
    }
}

/// Compile `pattern` against `lang` and execute it over the session's
/// tree. Read-only: the session is never mutated.
pub(crate) fn run(
    session: &Session,
    lang: SupportLang,
    pattern: &str,
) -> Result<Vec<MatchRecord>, QueryError> {
    let language = lang.get_ts_language();
    let query = Query::new(&language, pattern).map_err(QueryError::from_compile)?;
    let capture_names: Vec<String> = query.capture_names().iter().map(|s| s.to_string()).collect();

    let source = session.text();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, session.tree().root_node(), source.as_bytes());

    let mut records = Vec::new();

    // tree-sitter 0.25+ uses StreamingIterator
    while let Some(m) = matches.next() {
        let mut captures = Vec::with_capacity(m.captures.len());
        for capture in m.captures {
            let node = capture.node;
            let start = node.start_position();
            let end = node.end_position();
            // a capture range inconsistent with the buffer yields empty
            // text, never an out-of-bounds slice
            let text = source
                .get(node.start_byte()..node.end_byte())
                .unwrap_or("")
                .to_string();

            captures.push(CaptureRecord {
                name: capture_names[capture.index as usize].clone(),
                node_kind: node.kind().to_string(),
                text,
                start_byte: node.start_byte(),
                end_byte: node.end_byte(),
                start_row: start.row,
                start_col: start.column,
                end_row: end.row,
                end_col: end.column,
            });
        }
        records.push(MatchRecord {
            pattern_index: m.pattern_index,
            captures,
        });
    }

    Ok(records)
}
