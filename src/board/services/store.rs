//! Board store service: optimistic mutations with rollback against the
//! task repository.
//!
//! One store instance owns the in-memory board of one open project and
//! mediates every mutation between the UI and the repository. Mutations are
//! applied locally before the repository call resolves; a failed call rolls
//! the affected task back to its pre-mutation snapshot, and a successful call
//! reconciles the local copy with the authoritative record. The interior
//! mutex is never held across an await, so the store keeps accepting user
//! actions while a write is in flight.

use crate::board::{
    domain::{
        AssigneeRef, Board, BoardDomainError, BoardSnapshot, ColumnId, ProjectId, Task, TaskDraft,
        TaskId, TaskPatch, TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Result type for board store operations.
pub type BoardStoreResult<T> = Result<T, BoardStoreError>;

/// Monotonically increasing tag for outgoing mutations.
///
/// Reconciliation drops any server confirmation older than the task's latest
/// locally applied sequence number, so stale responses can never overwrite
/// newer local intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationSeq(u64);

impl MutationSeq {
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the wrapped sequence value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MutationSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Board-level operation names used in mutation error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Task creation.
    Create,
    /// Field edit, possibly including a column change.
    Update,
    /// Pure column move.
    Move,
    /// Task deletion.
    Delete,
}

impl MutationKind {
    /// Returns the operation name for display.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Move => "move",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input path that triggered a column move.
///
/// Buttons step through the restricted transition policy; drag-and-drop is
/// unrestricted because the user has explicit visual control. The asymmetry
/// is deliberate source behaviour, kept pending product confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTrigger {
    /// Directional button on the task card.
    Button,
    /// Drag-and-drop between columns.
    Drag,
}

/// Errors surfaced by board store operations.
#[derive(Debug, Clone, Error)]
pub enum BoardStoreError {
    /// Local precondition failure; never reaches the repository.
    #[error(transparent)]
    Validation(#[from] BoardDomainError),

    /// The initial or refreshing board fetch failed; prior state is kept.
    #[error("failed to load board for project {project_id}: {source}")]
    Load {
        /// Project whose board could not be fetched.
        project_id: ProjectId,
        /// Underlying repository failure.
        source: TaskRepositoryError,
    },

    /// A repository write failed; the optimistic change was rolled back.
    #[error("{operation} failed for task {task_id}: {source}")]
    Mutation {
        /// Operation that failed.
        operation: MutationKind,
        /// Task the operation targeted.
        task_id: TaskId,
        /// Underlying repository failure.
        source: TaskRepositoryError,
    },

    /// A second mutation targeted a task with an unresolved in-flight write.
    #[error("task {0} has an unresolved in-flight write")]
    ConcurrentModification(TaskId),

    /// The task is not present on the board.
    #[error("task not found on board: {0}")]
    TaskNotFound(TaskId),

    /// Interior state lock was poisoned by a panicked holder.
    #[error("board store state poisoned: {0}")]
    Poisoned(String),
}

/// Request payload for creating a task.
///
/// Carries the raw title so that validation happens inside [`BoardStore::add_task`]
/// as a pure local precondition, before any repository round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    assignee_ref: Option<AssigneeRef>,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            assignee_ref: None,
            due_date: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee reference.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_ref: AssigneeRef) -> Self {
        self.assignee_ref = Some(assignee_ref);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    fn into_draft(self) -> Result<TaskDraft, BoardDomainError> {
        let title = TaskTitle::new(self.title)?;
        let mut draft = TaskDraft::new(title);
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        if let Some(assignee_ref) = self.assignee_ref {
            draft = draft.with_assignee(assignee_ref);
        }
        if let Some(due_date) = self.due_date {
            draft = draft.with_due_date(due_date);
        }
        Ok(draft)
    }
}

/// Pre-mutation capture of one task's value and placement, used for rollback.
#[derive(Debug, Clone)]
struct TaskSnapshot {
    task: Task,
    index: usize,
}

#[derive(Debug)]
struct StoreState {
    board: Board,
    next_seq: u64,
    // Bumped by every reload; completion handlers compare against the
    // generation captured at optimistic apply and drop stale outcomes.
    generation: u64,
    in_flight: HashMap<TaskId, MutationSeq>,
    applied: HashMap<TaskId, MutationSeq>,
}

impl StoreState {
    fn new(project_id: ProjectId) -> Self {
        Self {
            board: Board::new(project_id),
            next_seq: 0,
            generation: 0,
            in_flight: HashMap::new(),
            applied: HashMap::new(),
        }
    }

    fn begin_mutation(&mut self) -> MutationSeq {
        self.next_seq += 1;
        MutationSeq(self.next_seq)
    }

    fn ensure_idle(&self, id: TaskId) -> BoardStoreResult<()> {
        if self.in_flight.contains_key(&id) {
            return Err(BoardStoreError::ConcurrentModification(id));
        }
        Ok(())
    }

    fn finish(&mut self, id: TaskId) {
        self.in_flight.remove(&id);
    }

    fn reconcile(&mut self, task: Task, seq: MutationSeq) {
        let stale = self
            .applied
            .get(&task.id())
            .is_some_and(|latest| *latest > seq);
        if stale {
            return;
        }
        let id = task.id();
        if self.board.replace_task(task) {
            self.applied.insert(id, seq);
        }
    }

    fn rollback(&mut self, id: TaskId, snapshot: TaskSnapshot) {
        self.board.remove_task(id);
        self.board.insert_task(snapshot.task, Some(snapshot.index));
        debug_assert!(self.board.partition_holds());
    }
}

/// Owns one project's board and mediates every mutation between the UI and
/// the [`TaskRepository`] collaborator.
///
/// Constructor-injected and scoped to one open project; tests instantiate
/// isolated stores without any ambient singleton. Methods take `&self`, so
/// callers keep the store in an [`Arc`] and may drop their handle while a
/// spawned write completes fire-and-forget.
pub struct BoardStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    project_id: ProjectId,
    repository: Arc<R>,
    clock: Arc<C>,
    state: Mutex<StoreState>,
}

impl<R, C> BoardStore<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a store with an empty board for the given project.
    #[must_use]
    pub fn new(project_id: ProjectId, repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            project_id,
            repository,
            clock,
            state: Mutex::new(StoreState::new(project_id)),
        }
    }

    /// Returns the project this store is scoped to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns a read-only snapshot of the current board for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Poisoned`] when the state lock is poisoned.
    pub fn snapshot(&self) -> BoardStoreResult<BoardSnapshot> {
        Ok(self.lock_state()?.board.snapshot())
    }

    /// Fetches the full task set and rebuilds the board, partitioning tasks
    /// into columns by status.
    ///
    /// A successful reload re-bases the board on the authoritative record and
    /// starts a new board generation: writes issued before the reload can no
    /// longer touch the board when they resolve, whether they succeed or roll
    /// back. On failure the store keeps its previous state (or the empty
    /// board before the first load).
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Load`] when the repository fetch fails.
    pub async fn load(&self) -> BoardStoreResult<BoardSnapshot> {
        let tasks = self
            .repository
            .list_by_project(self.project_id)
            .await
            .map_err(|source| BoardStoreError::Load {
                project_id: self.project_id,
                source,
            })?;

        let mut state = self.lock_state()?;
        state.board = Board::from_tasks(self.project_id, tasks);
        state.generation += 1;
        state.in_flight.clear();
        state.applied.clear();
        debug_assert!(state.board.partition_holds());
        Ok(state.board.snapshot())
    }

    /// Creates a task; new tasks always enter the backlog column.
    ///
    /// The title is validated locally before anything else happens. An
    /// optimistic placeholder row appears in the backlog until the
    /// repository responds; on success the server record (with its assigned
    /// id) replaces the placeholder in place, on failure the placeholder is
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Validation`] for an empty title (no
    /// repository round-trip) or [`BoardStoreError::Mutation`] when the
    /// repository rejects the create.
    pub async fn add_task(&self, request: CreateTaskRequest) -> BoardStoreResult<Task> {
        let draft = request.into_draft()?;

        let (placeholder_id, seq, generation) = {
            let mut state = self.lock_state()?;
            let seq = state.begin_mutation();
            let placeholder = Task::new(self.project_id, &draft, &*self.clock);
            let id = placeholder.id();
            state.board.insert_task(placeholder, None);
            state.in_flight.insert(id, seq);
            state.applied.insert(id, seq);
            (id, seq, state.generation)
        };

        match self.repository.create(self.project_id, &draft).await {
            Ok(created) => {
                let mut state = self.lock_state()?;
                if state.generation != generation {
                    // A reload replaced the board; it will pick up the
                    // created record on its own.
                    return Ok(created);
                }
                state.finish(placeholder_id);
                state.applied.remove(&placeholder_id);
                let position = state
                    .board
                    .remove_task(placeholder_id)
                    .map(|(_, index)| index);
                state.board.insert_task(created.clone(), position);
                state.applied.insert(created.id(), seq);
                debug_assert!(state.board.partition_holds());
                Ok(created)
            }
            Err(source) => {
                let mut state = self.lock_state()?;
                if state.generation == generation {
                    state.finish(placeholder_id);
                    state.applied.remove(&placeholder_id);
                    state.board.remove_task(placeholder_id);
                    debug_assert!(state.board.partition_holds());
                }
                Err(BoardStoreError::Mutation {
                    operation: MutationKind::Create,
                    task_id: placeholder_id,
                    source,
                })
            }
        }
    }

    /// Edits a task's mutable fields and, when the patch carries a status,
    /// moves it to the matching column.
    ///
    /// The edit is applied optimistically; a column change removes the task
    /// from its current column and appends it to the target one before the
    /// repository call resolves. On failure the pre-mutation snapshot is
    /// restored verbatim, content and placement both.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] for an unknown task,
    /// [`BoardStoreError::ConcurrentModification`] when a write for the task
    /// is still in flight, or [`BoardStoreError::Mutation`] when the
    /// repository rejects the update.
    pub async fn update_task(&self, id: TaskId, patch: TaskPatch) -> BoardStoreResult<Task> {
        self.apply_update(id, patch, MutationKind::Update, None)
            .await
    }

    /// Moves a task between columns.
    ///
    /// Button-driven moves consult the restricted transition policy
    /// (backlog advances to in-progress; in-progress moves either way; done
    /// is terminal); drag-and-drop may target any column. A same-column drag
    /// is a no-op. Same optimistic/rollback contract as [`Self::update_task`].
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::Validation`] when the policy forbids the
    /// move or the task is not in `from`, [`BoardStoreError::TaskNotFound`],
    /// [`BoardStoreError::ConcurrentModification`], or
    /// [`BoardStoreError::Mutation`] as for updates.
    pub async fn move_task(
        &self,
        id: TaskId,
        from: ColumnId,
        to: ColumnId,
        trigger: MoveTrigger,
    ) -> BoardStoreResult<()> {
        if trigger == MoveTrigger::Button && !from.button_move_allowed(to) {
            return Err(BoardDomainError::InvalidButtonMove { from, to }.into());
        }
        if trigger == MoveTrigger::Drag && from == to {
            let state = self.lock_state()?;
            let location = state
                .board
                .locate(id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            if location.status != from {
                return Err(BoardDomainError::TaskNotInColumn {
                    task_id: id,
                    column: from,
                }
                .into());
            }
            return Ok(());
        }

        let patch = TaskPatch::new().with_status(to);
        self.apply_update(id, patch, MutationKind::Move, Some(from))
            .await
            .map(|_| ())
    }

    /// Deletes a task.
    ///
    /// The row disappears optimistically; on repository failure it is
    /// re-inserted at its original index in its original column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardStoreError::TaskNotFound`] when the task is not on the
    /// board (a stale row is distinguishable from a successful delete),
    /// [`BoardStoreError::ConcurrentModification`] when a write for the task
    /// is still in flight, or [`BoardStoreError::Mutation`] when the
    /// repository rejects the delete.
    pub async fn delete_task(&self, id: TaskId) -> BoardStoreResult<()> {
        let (snapshot, generation) = {
            let mut state = self.lock_state()?;
            state.ensure_idle(id)?;
            let (task, index) = state
                .board
                .remove_task(id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            let seq = state.begin_mutation();
            state.in_flight.insert(id, seq);
            state.applied.insert(id, seq);
            (TaskSnapshot { task, index }, state.generation)
        };

        match self.repository.delete(id).await {
            Ok(()) => {
                let mut state = self.lock_state()?;
                if state.generation == generation {
                    state.finish(id);
                    state.applied.remove(&id);
                }
                Ok(())
            }
            Err(source) => {
                let mut state = self.lock_state()?;
                if state.generation == generation {
                    state.finish(id);
                    state.rollback(id, snapshot);
                }
                Err(BoardStoreError::Mutation {
                    operation: MutationKind::Delete,
                    task_id: id,
                    source,
                })
            }
        }
    }

    /// Applies an authoritative server record to the local board.
    ///
    /// Internal helper invoked after every successful repository write. The
    /// record replaces the local optimistic copy in place, preserving column
    /// order around it. A record whose sequence number is older than the
    /// task's latest locally applied sequence is dropped: last local intent
    /// wins over stale server confirmation. Records for tasks no longer on
    /// the board are ignored.
    pub(crate) fn reconcile_from_server(
        &self,
        task: Task,
        seq: MutationSeq,
    ) -> BoardStoreResult<()> {
        let mut state = self.lock_state()?;
        state.reconcile(task, seq);
        debug_assert!(state.board.partition_holds());
        Ok(())
    }

    async fn apply_update(
        &self,
        id: TaskId,
        patch: TaskPatch,
        operation: MutationKind,
        expected_column: Option<ColumnId>,
    ) -> BoardStoreResult<Task> {
        let (snapshot, seq, generation) = {
            let mut state = self.lock_state()?;
            let location = state
                .board
                .locate(id)
                .ok_or(BoardStoreError::TaskNotFound(id))?;
            if let Some(expected) = expected_column {
                if location.status != expected {
                    return Err(BoardDomainError::TaskNotInColumn {
                        task_id: id,
                        column: expected,
                    }
                    .into());
                }
            }
            state.ensure_idle(id)?;

            let seq = state.begin_mutation();
            let Some((task, index)) = state.board.remove_task(id) else {
                return Err(BoardStoreError::TaskNotFound(id));
            };
            let snapshot = TaskSnapshot {
                task: task.clone(),
                index,
            };
            let mut updated = task;
            updated.apply_patch(&patch, &*self.clock);
            let position = (updated.status() == snapshot.task.status()).then_some(index);
            state.board.insert_task(updated, position);
            state.in_flight.insert(id, seq);
            state.applied.insert(id, seq);
            debug_assert!(state.board.partition_holds());
            (snapshot, seq, state.generation)
        };

        match self.repository.update(id, &patch).await {
            Ok(server) => {
                let mut state = self.lock_state()?;
                if state.generation == generation {
                    state.finish(id);
                    state.reconcile(server.clone(), seq);
                    debug_assert!(state.board.partition_holds());
                }
                Ok(server)
            }
            Err(source) => {
                let mut state = self.lock_state()?;
                if state.generation == generation {
                    state.finish(id);
                    state.rollback(id, snapshot);
                }
                Err(BoardStoreError::Mutation {
                    operation,
                    task_id: id,
                    source,
                })
            }
        }
    }

    fn lock_state(&self) -> BoardStoreResult<MutexGuard<'_, StoreState>> {
        self.state
            .lock()
            .map_err(|err| BoardStoreError::Poisoned(err.to_string()))
    }
}
