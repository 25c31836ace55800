//! Repository port for durable task persistence.
//!
//! The repository is the durable owner of record; the board store only ever
//! talks to it through this contract, so the concrete transport (database,
//! RPC backend) stays out of scope.

use crate::board::domain::{ProjectId, Task, TaskDraft, TaskId, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Durable CRUD contract for tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every task belonging to the project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the backing store
    /// cannot be reached or rejects the query.
    async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Stores a new task, assigning its identifier, backlog status, and
    /// timestamps on the durable side.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the write fails.
    async fn create(&self, project_id: ProjectId, draft: &TaskDraft) -> TaskRepositoryResult<Task>;

    /// Applies a patch to an existing task and returns the authoritative
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::Persistence`] when the write fails.
    async fn update(&self, task_id: TaskId, patch: &TaskPatch) -> TaskRepositoryResult<Task>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist, or [`TaskRepositoryError::Persistence`] when the write fails.
    async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
