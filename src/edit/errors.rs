use crate::session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error("edit {index}: byte range {start_byte}..{end_byte} is invalid for a {source_len}-byte buffer")]
    InvalidRange {
        index: usize,
        start_byte: usize,
        end_byte: usize,
        source_len: usize,
    },

    #[error("edits overlap: edit at byte {first_start} and edit at byte {second_start}")]
    OverlappingEdits {
        first_start: usize,
        second_start: usize,
    },

    #[error("edits would produce a buffer that is not valid UTF-8")]
    InvalidUtf8,

    #[error("edit {index}: old_text is empty")]
    EmptySnippet { index: usize },

    #[error("edit {index}: old_text not found in source")]
    SnippetNotFound { index: usize },

    #[error("edit {index}: old_text matches {count} locations, must be unique")]
    AmbiguousSnippet { index: usize, count: usize },

    #[error("edit {index}: matched text is inside '{actual}', expected '{expected}'")]
    KindMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("edits {first_index} and {second_index} have overlapping match ranges")]
    OverlappingMatches {
        first_index: usize,
        second_index: usize,
    },

    #[error("edits would introduce {error_count} parse errors, batch rolled back")]
    WouldBreakSyntax { error_count: usize },

    #[error(transparent)]
    Session(#[from] SessionError),
}
