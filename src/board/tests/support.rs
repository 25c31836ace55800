//! Shared fixtures and test doubles for board unit tests.

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

use crate::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{
        PersistedTaskData, ProjectId, Task, TaskDraft, TaskId, TaskPatch, TaskStatus, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Builds a persisted task for seeding repositories and boards.
pub fn seeded_task(project_id: ProjectId, title: &str, status: TaskStatus) -> Task {
    let timestamp = Utc::now();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        project_id,
        title: TaskTitle::new(title).expect("test titles are non-empty"),
        description: None,
        assignee_ref: None,
        due_date: None,
        status,
        created_at: timestamp,
        updated_at: timestamp,
    })
}

mock! {
    /// Scripted repository for failure-path tests.
    pub TaskRepo {}

    #[async_trait]
    impl TaskRepository for TaskRepo {
        async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;
        async fn create(
            &self,
            project_id: ProjectId,
            draft: &TaskDraft,
        ) -> TaskRepositoryResult<Task>;
        async fn update(&self, task_id: TaskId, patch: &TaskPatch) -> TaskRepositoryResult<Task>;
        async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()>;
    }
}

/// Returns the persistence error injected by test repositories.
pub fn injected_failure() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("injected repository failure"))
}

/// In-memory repository whose `update` calls park until released, so tests
/// can observe optimistic state while a write is in flight.
pub struct GatedRepository {
    inner: InMemoryTaskRepository,
    release: Notify,
    fail_update: AtomicBool,
}

impl GatedRepository {
    pub fn new(inner: InMemoryTaskRepository) -> Arc<Self> {
        Arc::new(Self {
            inner,
            release: Notify::new(),
            fail_update: AtomicBool::new(false),
        })
    }

    /// Lets the next parked `update` proceed.
    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Makes the next released `update` fail instead of delegating.
    pub fn fail_next_update(&self) {
        self.fail_update.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl TaskRepository for GatedRepository {
    async fn list_by_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        self.inner.list_by_project(project_id).await
    }

    async fn create(&self, project_id: ProjectId, draft: &TaskDraft) -> TaskRepositoryResult<Task> {
        self.inner.create(project_id, draft).await
    }

    async fn update(&self, task_id: TaskId, patch: &TaskPatch) -> TaskRepositoryResult<Task> {
        self.release.notified().await;
        if self.fail_update.swap(false, Ordering::SeqCst) {
            return Err(injected_failure());
        }
        self.inner.update(task_id, patch).await
    }

    async fn delete(&self, task_id: TaskId) -> TaskRepositoryResult<()> {
        self.inner.delete(task_id).await
    }
}
