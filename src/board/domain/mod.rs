//! Domain model for the kanban task board.
//!
//! The board domain models tasks, the three fixed work-state columns that
//! partition them, and the derived progress figure, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod board;
mod error;
mod ids;
mod status;
mod task;

pub use board::{Board, BoardSnapshot, Column, TaskLocation};
pub use error::{BoardDomainError, ParseTaskStatusError};
pub use ids::{AssigneeRef, ProjectId, TaskId, TaskTitle};
pub use status::TaskStatus;
pub use task::{PersistedTaskData, Task, TaskDraft, TaskPatch};

/// Type alias exposing [`TaskStatus`] under the column-identifier name used
/// by the presentation layer.
pub type ColumnId = TaskStatus;
