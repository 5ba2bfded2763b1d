use std::collections::HashMap;

use ast_grep_language::SupportLang;
use serde::Serialize;
use tracing::debug;
use tree_sitter::Tree;

use crate::edit::{self, ByteEdit, EditError, EditReport, NodeEdit, NodeEditOptions};
use crate::inspect::{self, ErrorRange};
use crate::parser::{GrammarError, GrammarParser};
use crate::query::{self, MatchRecord, QueryError};
use crate::session::errors::SessionError;
use crate::validate::{self, ValidationReport};

/// Outcome of parsing a buffer into a session.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub has_error: bool,
    pub node_count: usize,
    pub error_count: usize,
    /// Populated only when `has_error` is set; collecting spans costs a
    /// full walk.
    pub error_ranges: Vec<ErrorRange>,
}

impl ParseReport {
    pub(crate) fn from_tree(tree: &Tree) -> Self {
        let has_error = tree.root_node().has_error();
        let error_ranges = if has_error {
            inspect::collect_errors(tree)
        } else {
            Vec::new()
        };
        Self {
            has_error,
            node_count: inspect::count_nodes(tree),
            error_count: error_ranges.len(),
            error_ranges,
        }
    }
}

/// The owned (buffer, tree) pair for one open file.
///
/// The two fields are only ever replaced together; there is no way to end
/// up with a tree describing a buffer the session no longer holds.
pub struct Session {
    text: String,
    tree: Tree,
}

impl Session {
    fn new(text: String, tree: Tree) -> Self {
        Self { text, tree }
    }

    /// The session's current full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The syntax tree for [`Self::text`].
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Swap in a new buffer/tree pair. The old tree is released with the
    /// swap, never before.
    pub(crate) fn replace(&mut self, text: String, tree: Tree) {
        self.text = text;
        self.tree = tree;
    }
}

/// Maps file identifiers to open [`Session`]s and owns the grammar engine
/// they share.
///
/// Single-threaded by design: callers drive the store sequentially, and a
/// rejected operation never leaves a session's buffer and tree out of
/// sync.
pub struct SessionStore {
    parser: GrammarParser,
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    /// Create a store whose sessions all parse with the given grammar.
    pub fn new(lang: SupportLang) -> Result<Self, GrammarError> {
        Ok(Self {
            parser: GrammarParser::new(lang)?,
            sessions: HashMap::new(),
        })
    }

    /// The grammar shared by every session in this store.
    pub fn lang(&self) -> SupportLang {
        self.parser.lang()
    }

    /// Parse `content` and store it under `id`, replacing any session
    /// already open under that identifier. Nothing is stored when the
    /// parser yields no tree.
    pub fn open(
        &mut self,
        id: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<ParseReport, SessionError> {
        let id = id.into();
        let content = content.into();
        let tree = self.parser.parse(&content)?;
        let report = ParseReport::from_tree(&tree);
        debug!(id = %id, bytes = content.len(), has_error = report.has_error, "session opened");
        self.sessions.insert(id, Session::new(content, tree));
        Ok(report)
    }

    /// Release the session under `id`. Returns whether one existed.
    pub fn close(&mut self, id: &str) -> bool {
        let existed = self.sessions.remove(id).is_some();
        if existed {
            debug!(id = %id, "session closed");
        }
        existed
    }

    /// Replace the full content of an already-open session.
    ///
    /// The new content is parsed first; only on success is the old
    /// buffer/tree pair swapped out. A parse failure leaves the session
    /// exactly as it was.
    pub fn update(
        &mut self,
        id: &str,
        content: impl Into<String>,
    ) -> Result<ParseReport, SessionError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownFile(id.to_string()))?;
        let content = content.into();
        let tree = self.parser.parse(&content)?;
        let report = ParseReport::from_tree(&tree);
        debug!(id = %id, bytes = content.len(), has_error = report.has_error, "session updated");
        session.replace(content, tree);
        Ok(report)
    }

    /// Whether `id` is currently open.
    pub fn is_open(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    /// Identifiers of every open session, in no particular order.
    pub fn open_ids(&self) -> Vec<&str> {
        self.sessions.keys().map(String::as_str).collect()
    }

    /// Borrow the session under `id`.
    pub fn session(&self, id: &str) -> Result<&Session, SessionError> {
        self.sessions
            .get(id)
            .ok_or_else(|| SessionError::UnknownFile(id.to_string()))
    }

    /// The full current text of a session.
    pub fn source(&self, id: &str) -> Result<&str, SessionError> {
        Ok(self.session(id)?.text())
    }

    /// The text in `start_byte..end_byte` of a session's buffer.
    ///
    /// Any out-of-range or non-boundary slice yields the empty string.
    pub fn text_range(
        &self,
        id: &str,
        start_byte: usize,
        end_byte: usize,
    ) -> Result<&str, SessionError> {
        Ok(self
            .session(id)?
            .text()
            .get(start_byte..end_byte)
            .unwrap_or(""))
    }

    /// Parenthesized structural dump of a session's tree.
    pub fn debug_tree(&self, id: &str) -> Result<String, SessionError> {
        Ok(inspect::debug_sexp(self.session(id)?.tree()))
    }

    /// Run a structural query over a session's tree.
    pub fn run_query(&self, id: &str, pattern: &str) -> Result<Vec<MatchRecord>, QueryError> {
        let session = self.session(id)?;
        query::run(session, self.parser.lang(), pattern)
    }

    /// Apply a batch of byte-range edits to a session.
    pub fn apply_byte_edits(
        &mut self,
        id: &str,
        edits: &[ByteEdit],
        dry_run: bool,
    ) -> Result<EditReport, EditError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownFile(id.to_string()))?;
        edit::byte::apply(&mut self.parser, session, edits, dry_run)
    }

    /// Resolve snippet-based edits against a session and apply them.
    pub fn apply_node_edits(
        &mut self,
        id: &str,
        edits: &[NodeEdit],
        options: &NodeEditOptions,
    ) -> Result<EditReport, EditError> {
        let session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownFile(id.to_string()))?;
        let byte_edits = edit::node::resolve(session, edits, options.auto_indent)?;
        if options.fail_on_parse_error {
            let preview = edit::byte::apply(&mut self.parser, session, &byte_edits, true)?;
            if preview.has_error {
                debug!(id = %id, error_count = preview.error_count, "node edits rolled back");
                return Err(EditError::WouldBreakSyntax {
                    error_count: preview.error_count,
                });
            }
        }
        edit::byte::apply(&mut self.parser, session, &byte_edits, options.dry_run)
    }

    /// One-shot syntax check of arbitrary source; needs no open session.
    pub fn validate(&mut self, source: &str) -> ValidationReport {
        validate::check_source(&mut self.parser, source)
    }
}
