use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::edit::errors::EditError;
use crate::inspect::{self, ErrorRange};
use crate::parser::GrammarParser;
use crate::session::{Session, SessionError};

/// A single byte-span replacement.
///
/// `start_byte..end_byte` is a half-open range into the buffer as it
/// existed before any edit in the batch was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteEdit {
    pub start_byte: usize,
    pub end_byte: usize,
    pub new_text: String,
}

/// Outcome of applying (or previewing) an edit batch.
#[derive(Debug, Clone, Serialize)]
pub struct EditReport {
    /// The full post-edit text, whether or not it was committed.
    pub new_source: String,
    pub has_error: bool,
    pub error_count: usize,
    pub error_ranges: Vec<ErrorRange>,
    pub edits_applied: usize,
}

/// Validate and apply an edit batch to a session.
///
/// The batch is all-or-nothing: any invalid range or overlapping pair
/// rejects every edit. With `dry_run` the report describes the would-be
/// result and the session keeps its current buffer/tree pair.
pub(crate) fn apply(
    parser: &mut GrammarParser,
    session: &mut Session,
    edits: &[ByteEdit],
    dry_run: bool,
) -> Result<EditReport, EditError> {
    let source_len = session.text().len();

    for (index, edit) in edits.iter().enumerate() {
        if edit.start_byte > edit.end_byte || edit.end_byte > source_len {
            return Err(EditError::InvalidRange {
                index,
                start_byte: edit.start_byte,
                end_byte: edit.end_byte,
                source_len,
            });
        }
    }

    let mut ordered: Vec<&ByteEdit> = edits.iter().collect();
    ordered.sort_by_key(|edit| edit.start_byte);

    // touching edits (end == next start) are fine; real overlap is not
    for pair in ordered.windows(2) {
        if pair[0].end_byte > pair[1].start_byte {
            return Err(EditError::OverlappingEdits {
                first_start: pair[0].start_byte,
                second_start: pair[1].start_byte,
            });
        }
    }

    // splice rightmost-first so earlier offsets stay valid throughout
    let mut buffer = session.text().as_bytes().to_vec();
    for edit in ordered.iter().rev() {
        buffer.splice(edit.start_byte..edit.end_byte, edit.new_text.bytes());
    }
    let new_source = String::from_utf8(buffer).map_err(|_| EditError::InvalidUtf8)?;

    let tree = parser.parse(&new_source).map_err(SessionError::from)?;
    let has_error = tree.root_node().has_error();
    let error_ranges = if has_error {
        inspect::collect_errors(&tree)
    } else {
        Vec::new()
    };

    let report = EditReport {
        new_source: new_source.clone(),
        has_error,
        error_count: error_ranges.len(),
        error_ranges,
        edits_applied: edits.len(),
    };

    debug!(
        edits = edits.len(),
        dry_run,
        has_error = report.has_error,
        "byte edits applied"
    );

    if !dry_run {
        session.replace(new_source, tree);
    }

    Ok(report)
}
