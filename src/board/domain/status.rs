//! Work-state enumeration shared by every consumer of the board.
//!
//! The original screens disagreed on status spellings (`"inProgress"` on one,
//! `"in_progress"` on another), so the boundary is strict: anything outside
//! the closed enumeration is rejected rather than silently defaulted.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Work state of a task; doubles as the identifier of the column holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Backlog,
    /// Work is underway.
    InProgress,
    /// Work is finished.
    Done,
}

impl TaskStatus {
    /// All statuses in fixed board column order.
    pub const ALL: [Self; 3] = [Self::Backlog, Self::InProgress, Self::Done];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the display label of the column for this status.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Backlog => "Backlog",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Returns `true` when no forward move exists from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns whether a button-driven move from `self` to `to` is allowed.
    ///
    /// Buttons only step one column at a time: `backlog` advances to
    /// `in_progress`, `in_progress` moves either way, and `done` offers no
    /// move at all. Drag-and-drop does not consult this table.
    #[must_use]
    pub const fn button_move_allowed(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Backlog, Self::InProgress)
                | (Self::InProgress, Self::Backlog | Self::Done)
        )
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "backlog" => Ok(Self::Backlog),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
