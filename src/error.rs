use std::path::PathBuf;

use thiserror::Error;

use crate::assignment::DATE_FORMAT_HUMAN;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Invalid deadline '{0}'. Please use this exact format: {fmt}", fmt = DATE_FORMAT_HUMAN)]
    InvalidDeadline(String),

    #[error("Assignment store at {} is corrupt: {source}", path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Assignment not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize assignments: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AssignmentError>;
