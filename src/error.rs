//! Error types for study-journey

use thiserror::Error;

#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid catalog: {0}")]
    Catalog(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Module {index} is locked until its prerequisites are complete")]
    Locked { index: usize },

    #[error("No module at index {index} (catalog has {len})")]
    UnknownModule { index: usize, len: usize },

    #[error("Cannot {action} while module is {state}")]
    InvalidTransition { action: &'static str, state: String },

    #[error("Invalid answers: {0}")]
    InvalidAnswers(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, JourneyError>;
