//! Error types for board domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or mutating board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The status value is not one of the closed enumeration.
    #[error("unknown task status: {0}")]
    UnknownStatus(String),

    /// The button-driven transition policy forbids this move.
    #[error("button move from {from} to {to} is not allowed")]
    InvalidButtonMove {
        /// Column the task currently occupies.
        from: TaskStatus,
        /// Column the move targeted.
        to: TaskStatus,
    },

    /// The task is not in the column the caller claimed it was in.
    #[error("task {task_id} is not in column {column}")]
    TaskNotInColumn {
        /// Task the caller referenced.
        task_id: TaskId,
        /// Column the caller expected the task to be in.
        column: TaskStatus,
    },
}

/// Error returned while parsing task statuses from loosely typed input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

impl From<ParseTaskStatusError> for BoardDomainError {
    fn from(err: ParseTaskStatusError) -> Self {
        Self::UnknownStatus(err.0)
    }
}
