use thiserror::Error;

#[derive(Error, Debug)]
pub enum HearthError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid override type '{0}' (expected include or exclude)")]
    InvalidOverrideType(String),

    #[error("Invalid override category '{0}' (expected spending or income)")]
    InvalidOverrideCategory(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HearthError>;
