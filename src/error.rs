//! Error taxonomy for the flashdecks crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("deck {0} not found")]
    DeckNotFound(i64),

    #[error("card {0} not found")]
    CardNotFound(i64),

    #[error("invalid deck document: {0}")]
    Validation(String),

    #[error("not a parseable deck document: {0}")]
    MalformedDocument(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for the "referenced id does not exist" class of failures,
    /// which callers report as a not-found outcome rather than a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::DeckNotFound(_) | AppError::CardNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
