use crate::parser::GrammarError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("file not open: {0}")]
    UnknownFile(String),

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
