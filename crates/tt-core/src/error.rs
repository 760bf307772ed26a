use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    /// An operation referenced a term string absent from the store.
    /// Data-integrity defect; the operation is aborted, state unchanged.
    UnknownTerm(String),
    /// A persisted row carried an unrecognized label or a duplicate string.
    MalformedRecord(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::UnknownTerm(s) => write!(f, "unknown term: '{s}'"),
            CoreError::MalformedRecord(msg) => write!(f, "malformed record: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;
