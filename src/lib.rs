//! Live, incrementally-editable syntax trees for source files.
//!
//! A [`SessionStore`] owns one (buffer, tree) pair per open file and keeps
//! the two consistent across every mutation: edits re-parse the full
//! buffer, and the pair is swapped atomically or not at all. Structural
//! queries, snippet-based edits and unified diffs are layered on top of
//! that store.
//!
//! # Architecture
//!
//! All mutation compiles down to a single primitive: [`ByteEdit`], a
//! validated byte-span replacement over a session's buffer. Intelligence
//! lives in span acquisition (snippet search, enclosing-node constraints,
//! structural queries), not in the application logic.
//!
//! # Safety
//!
//! - Edit batches are all-or-nothing; a rejected batch changes nothing
//! - Re-parse happens before commit, so buffer and tree never diverge
//! - Results are UTF-8 validated before they replace a buffer
//! - Previews (`dry_run`) compute the full result without mutating state
//!
//! # Example
//!
//! ```
//! use ast_session::lang::SupportLang;
//! use ast_session::{NodeEdit, NodeEditOptions, SessionStore};
//!
//! let mut store = SessionStore::new(SupportLang::Rust)?;
//! store.open("main.rs", "fn main() { old_call(); }")?;
//!
//! let matches = store.run_query("main.rs", "(function_item name: (identifier) @name)")?;
//! assert_eq!(matches[0].captures[0].text, "main");
//!
//! let report = store.apply_node_edits(
//!     "main.rs",
//!     &[NodeEdit {
//!         old_text: "old_call()".into(),
//!         new_text: "new_call()".into(),
//!         expected_kind: None,
//!     }],
//!     &NodeEditOptions::default(),
//! )?;
//! assert_eq!(report.new_source, "fn main() { new_call(); }");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod diff;
pub mod edit;
pub mod inspect;
pub mod lang;
pub mod parser;
pub mod query;
pub mod session;
pub mod validate;

// Re-exports
pub use diff::unified_diff;
pub use edit::{ByteEdit, EditError, EditReport, NodeEdit, NodeEditOptions};
pub use inspect::ErrorRange;
pub use parser::{GrammarError, GrammarParser};
pub use query::{CaptureRecord, MatchRecord, QueryError};
pub use session::{ParseReport, Session, SessionError, SessionStore};
pub use validate::{SyntaxIssue, ValidationReport};
