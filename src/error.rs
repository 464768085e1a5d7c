//! Error types for the task board

use crate::column::ColumnId;
use crate::task::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors raised by board mutators and the state store
#[derive(Debug, Error)]
pub enum BoardError {
    /// No task at the given position
    #[error("no task at index {index} of column '{column}'")]
    TaskNotFound { column: ColumnId, index: usize },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors raised by the persistence layer
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("storage I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored blob is not a valid board
    #[error("stored board is malformed: {reason}")]
    Malformed { reason: String },

    #[error("failed to serialize board: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StorageError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_column(id: ColumnId) -> Self {
        Self::malformed(format!("missing column '{id}'"))
    }

    pub(crate) fn duplicate_task(id: &TaskId) -> Self {
        Self::malformed(format!("duplicate task id '{id}'"))
    }
}
