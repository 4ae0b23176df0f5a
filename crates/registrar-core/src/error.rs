use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    Missing,
    NotString,
    Empty,
    TooShort,
    TooLong,
    Pattern,
    NotAllowed,
    Unknown,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    pub field: String,
    pub violation: Violation,
    pub message: String,
}
