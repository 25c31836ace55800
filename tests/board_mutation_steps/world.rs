//! Shared world state for board mutation BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use trellis::board::{
    adapters::memory::InMemoryTaskRepository,
    domain::{ProjectId, Task, TaskId},
    services::{BoardStore, BoardStoreError},
};

/// Store type used by the BDD world.
pub type TestBoardStore = BoardStore<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for board mutation behaviour tests.
pub struct BoardWorld {
    pub project_id: ProjectId,
    pub repository: InMemoryTaskRepository,
    pub store: TestBoardStore,
    pub task_ids: HashMap<String, TaskId>,
    pub last_move_result: Option<Result<(), BoardStoreError>>,
    pub last_add_result: Option<Result<Task, BoardStoreError>>,
}

impl BoardWorld {
    /// Creates a world with a fresh project, repository, and store.
    #[must_use]
    pub fn new() -> Self {
        let project_id = ProjectId::new();
        let repository = InMemoryTaskRepository::default();
        let store = BoardStore::new(
            project_id,
            Arc::new(repository.clone()),
            Arc::new(DefaultClock),
        );

        Self {
            project_id,
            repository,
            store,
            task_ids: HashMap::new(),
            last_move_result: None,
            last_add_result: None,
        }
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
