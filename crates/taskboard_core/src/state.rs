//! Explicit application state owned by the board.
//!
//! # Invariants
//! - `tasks` is always priority-sorted; it is replaced wholesale from the
//!   storage change feed and never mutated in place by actions.
//! - At most one task is in edit mode.
//! - At most one storage write is in flight.

use crate::model::suggestion::SuggestionId;
use crate::model::task::{Task, TaskId, MAX_TASKS};

/// Control whose storage write is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardControl {
    AddTask,
    SaveEdit(TaskId),
    Complete(TaskId),
    AcceptSuggestion(SuggestionId),
}

/// User-facing message left by the last failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Validation(String),
    LimitReached,
    StorageFailed,
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::LimitReached => format!("Task limit of {MAX_TASKS} reached."),
            Self::StorageFailed => "Could not save changes. Please try again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub editing: Option<TaskId>,
    pub dark_mode: bool,
    pub in_flight: Option<BoardControl>,
    pub notice: Option<Notice>,
}

impl AppState {
    pub fn find_task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn incomplete_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }
}
