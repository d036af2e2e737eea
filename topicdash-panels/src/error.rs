//! Panel-level errors.

use thiserror::Error;

use topicdash_core::{DataError, ScoreKey, ScoreScope};

#[derive(Debug, Error)]
pub enum PanelError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("{scope} scope needs a {expected} score table, got {actual}")]
    ScopeMismatch {
        scope: &'static str,
        expected: ScoreScope,
        actual: ScoreScope,
    },

    #[error("score table for the {0} panel has no keys")]
    EmptyScores(&'static str),

    #[error("key '{0}' does not belong to this panel's scope")]
    ForeignKey(ScoreKey),

    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("no table panel at index {0}")]
    NoSuchTable(usize),
}
