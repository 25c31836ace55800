//! In-memory repository for board store tests and local development.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{ProjectId, Task, TaskDraft, TaskId, TaskPatch},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Plays the durable side of the contract: it mints identifiers, forces new
/// tasks into the backlog, and stamps timestamps from the injected clock.
#[derive(Debug)]
pub struct InMemoryTaskRepository<C = DefaultClock> {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    project_index: HashMap<ProjectId, Vec<TaskId>>,
}

impl<C> InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty in-memory repository with the given clock.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock,
        }
    }

    /// Seeds an existing task record, preserving its persisted fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the state lock is
    /// poisoned.
    pub fn seed(&self, task: Task) -> TaskRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        state
            .project_index
            .entry(task.project_id())
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task);
        Ok(())
    }
}

impl Default for InMemoryTaskRepository<DefaultClock> {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

fn write_state(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockWriteGuard<'_, InMemoryTaskState>> {
    state
        .write()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

fn read_state(
    state: &Arc<RwLock<InMemoryTaskState>>,
) -> TaskRepositoryResult<std::sync::RwLockReadGuard<'_, InMemoryTaskState>> {
    state
        .read()
        .map_err(|err| TaskRepositoryError::persistence(std::io::Error::other(err.to_string())))
}

#[async_trait]
impl<C> TaskRepository for InMemoryTaskRepository<C>
where
    C: Clock + Send + Sync,
{
    async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let state = read_state(&self.state)?;
        let tasks = state
            .project_index
            .get(&project_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.tasks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(tasks)
    }

    async fn create(&self, project_id: ProjectId, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        let task = Task::new(project_id, draft, &*self.clock);
        let mut state = write_state(&self.state)?;
        state
            .project_index
            .entry(project_id)
            .or_default()
            .push(task.id());
        state.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    async fn update(&self, task_id: TaskId, patch: &TaskPatch) -> TaskRepositoryResult<Task> {
        let clock = Arc::clone(&self.clock);
        let mut state = write_state(&self.state)?;
        let task = state
            .tasks
            .get_mut(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        task.apply_patch(patch, &*clock);
        Ok(task.clone())
    }

    async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        let mut state = write_state(&self.state)?;
        let task = state
            .tasks
            .remove(&task_id)
            .ok_or(TaskRepositoryError::NotFound(task_id))?;
        if let Some(ids) = state.project_index.get_mut(&task.project_id()) {
            ids.retain(|id| *id != task_id);
            if ids.is_empty() {
                state.project_index.remove(&task.project_id());
            }
        }
        Ok(())
    }
}
