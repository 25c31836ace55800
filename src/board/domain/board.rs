//! Project board aggregate: three fixed columns partitioning the task set.

use super::{ProjectId, Task, TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named, ordered bucket of tasks sharing one status value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    id: TaskStatus,
    tasks: Vec<Task>,
}

impl Column {
    /// Creates an empty column for the given status.
    #[must_use]
    pub const fn new(id: TaskStatus) -> Self {
        Self {
            id,
            tasks: Vec::new(),
        }
    }

    /// Returns the column identifier (its status value).
    #[must_use]
    pub const fn id(&self) -> TaskStatus {
        self.id
    }

    /// Returns the display label for this column.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.id.label()
    }

    /// Returns the tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the number of tasks in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when the column holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Position of a task within the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskLocation {
    /// Column holding the task.
    pub status: TaskStatus,
    /// Index within that column's display order.
    pub index: usize,
}

/// One project's task board: a project reference plus exactly three columns.
///
/// The columns partition the project's task set: every task belongs to
/// exactly one column and its status equals the id of the containing column.
/// Mutation helpers are crate-internal; consumers observe the board through
/// [`BoardSnapshot`] values handed out by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    project_id: ProjectId,
    backlog: Column,
    in_progress: Column,
    done: Column,
}

impl Board {
    /// Creates an empty board for a project.
    #[must_use]
    pub const fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            backlog: Column::new(TaskStatus::Backlog),
            in_progress: Column::new(TaskStatus::InProgress),
            done: Column::new(TaskStatus::Done),
        }
    }

    /// Builds a board by partitioning tasks into columns by status,
    /// preserving the input order within each column.
    #[must_use]
    pub fn from_tasks(project_id: ProjectId, tasks: Vec<Task>) -> Self {
        let mut board = Self::new(project_id);
        for task in tasks {
            board.column_mut(task.status()).tasks.push(task);
        }
        board
    }

    /// Returns the owning project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the column for a status.
    #[must_use]
    pub const fn column(&self, status: TaskStatus) -> &Column {
        match status {
            TaskStatus::Backlog => &self.backlog,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Done => &self.done,
        }
    }

    /// Returns the three columns in fixed board order.
    #[must_use]
    pub const fn columns(&self) -> [&Column; 3] {
        [&self.backlog, &self.in_progress, &self.done]
    }

    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.backlog.len() + self.in_progress.len() + self.done.len()
    }

    /// Returns `true` when the board holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task_count() == 0
    }

    /// Returns the completion percentage: `round(100 * done / total)`,
    /// 0 for an empty board.
    #[must_use]
    pub fn progress(&self) -> u8 {
        let done = u64::try_from(self.done.len()).unwrap_or(u64::MAX);
        let total = u64::try_from(self.task_count()).unwrap_or(u64::MAX);
        // Integer rounding: floor((200d + t) / 2t) == round(100d / t).
        let percent = (200 * done + total).checked_div(2 * total).unwrap_or(0);
        u8::try_from(percent).unwrap_or(100)
    }

    /// Finds a task anywhere on the board.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.columns()
            .into_iter()
            .flat_map(|column| column.tasks.iter())
            .find(|task| task.id() == id)
    }

    /// Locates a task's column and index.
    #[must_use]
    pub fn locate(&self, id: TaskId) -> Option<TaskLocation> {
        for column in self.columns() {
            if let Some(index) = column.tasks.iter().position(|task| task.id() == id) {
                return Some(TaskLocation {
                    status: column.id,
                    index,
                });
            }
        }
        None
    }

    /// Checks the partition invariant: every task appears exactly once and
    /// its status equals the id of the containing column.
    #[must_use]
    pub fn partition_holds(&self) -> bool {
        let mut seen = HashSet::new();
        for column in self.columns() {
            for task in &column.tasks {
                if task.status() != column.id || !seen.insert(task.id()) {
                    return false;
                }
            }
        }
        true
    }

    /// Takes an immutable point-in-time snapshot for rendering and rollback
    /// comparison.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            board: self.clone(),
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Column {
        match status {
            TaskStatus::Backlog => &mut self.backlog,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Done => &mut self.done,
        }
    }

    /// Inserts a task into the column matching its status.
    ///
    /// `index` clamps to the column length; `None` appends.
    pub(crate) fn insert_task(&mut self, task: Task, index: Option<usize>) {
        let column = self.column_mut(task.status());
        let position = index.map_or(column.tasks.len(), |at| at.min(column.tasks.len()));
        column.tasks.insert(position, task);
    }

    /// Removes a task from the board, returning it with its former index.
    pub(crate) fn remove_task(&mut self, id: TaskId) -> Option<(Task, usize)> {
        let location = self.locate(id)?;
        let column = self.column_mut(location.status);
        let task = column.tasks.remove(location.index);
        Some((task, location.index))
    }

    /// Replaces a task with an authoritative record, preserving its position.
    ///
    /// When the record's status differs from the containing column the task
    /// is relocated to its status column instead; the partition invariant
    /// outranks positional stability. Returns `false` when the task is not
    /// on the board.
    pub(crate) fn replace_task(&mut self, task: Task) -> bool {
        let Some(location) = self.locate(task.id()) else {
            return false;
        };
        if location.status == task.status() {
            let column = self.column_mut(location.status);
            if let Some(slot) = column.tasks.get_mut(location.index) {
                *slot = task;
            }
        } else {
            self.column_mut(location.status).tasks.remove(location.index);
            self.column_mut(task.status()).tasks.push(task);
        }
        true
    }
}

/// Immutable copy of the full board state at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    board: Board,
}

impl BoardSnapshot {
    /// Returns the captured board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the captured project identifier.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.board.project_id()
    }

    /// Returns the captured columns in fixed board order.
    #[must_use]
    pub const fn columns(&self) -> [&Column; 3] {
        self.board.columns()
    }

    /// Returns the captured completion percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.board.progress()
    }
}
