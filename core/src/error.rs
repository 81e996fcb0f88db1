use crate::index::DocId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid boolean operator {0:?}, expected AND or OR")]
    InvalidOperator(String),

    #[error("invalid cutoff k={0}, must be at least 1")]
    InvalidCutoff(usize),

    #[error("document id {0} was supplied more than once")]
    DuplicateDocumentId(DocId),
}
