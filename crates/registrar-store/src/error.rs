use registrar_sheets::SheetError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("duplicate phone: {0}")]
    DuplicatePhone(String),
    #[error("invalid stored data: {0}")]
    InvalidData(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Sheet,
    MissingHomeDir,
    InvalidDataPath,
    Migration,
    DuplicatePhone,
    InvalidData,
    Unavailable,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Sheet(_) => StoreErrorKind::Sheet,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::DuplicatePhone(_) => StoreErrorKind::DuplicatePhone,
            StoreError::InvalidData(_) => StoreErrorKind::InvalidData,
            StoreError::Unavailable(_) => StoreErrorKind::Unavailable,
        }
    }

    pub fn reason(&self) -> String {
        match self {
            StoreError::Sheet(err) => err.reason(),
            other => other.to_string(),
        }
    }
}
