//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by storage collaborators.
//! - Validate user-entered drafts before they reach classification/storage.
//!
//! # Invariants
//! - `id` is stable and never reused for another task.
//! - `title` is non-empty after trimming whenever a draft is accepted.
//! - `priority` is derived by the classifier, never assigned from user input.
//! - `completed` is terminal; completed tasks accept no further edits.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Maximum number of tasks a board accepts.
pub const MAX_TASKS: usize = 999;

/// ISO calendar date format used for deadlines.
pub const DEADLINE_FORMAT: &str = "%Y-%m-%d";

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date regex"));

/// Stable identifier for every task.
pub type TaskId = Uuid;

/// Priority tier inferred from task text and deadline.
///
/// `Unknown` only appears for foreign persisted values and always sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Immediate,
    Important,
    Least,
    #[serde(other)]
    Unknown,
}

impl Priority {
    /// Sort rank: lower ranks render first.
    pub fn rank(self) -> u8 {
        match self {
            Self::Immediate => 0,
            Self::Important => 1,
            Self::Least => 2,
            Self::Unknown => 3,
        }
    }

    /// Storage/wire spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Important => "important",
            Self::Least => "least",
            Self::Unknown => "unknown",
        }
    }

    /// Parses a stored value, mapping anything unrecognized to `Unknown`.
    pub fn from_stored(value: &str) -> Self {
        match value {
            "immediate" => Self::Immediate,
            "important" => Self::Important,
            "least" => Self::Least,
            _ => Self::Unknown,
        }
    }

    /// Human-facing label shown on task cards.
    pub fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Immediate Action",
            Self::Important => "Important",
            Self::Least => "Least Important",
            Self::Unknown => "Unprioritized",
        }
    }
}

/// Validation errors for task drafts and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Task id is the nil UUID.
    NilId,
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Deadline field was left empty.
    MissingDeadline,
    /// Deadline is not a valid `YYYY-MM-DD` calendar date.
    InvalidDeadline(String),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id cannot be nil"),
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::MissingDeadline => write!(f, "task deadline is required"),
            Self::InvalidDeadline(value) => {
                write!(f, "task deadline `{value}` is not a YYYY-MM-DD date")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Parses an ISO `YYYY-MM-DD` deadline.
///
/// Returns `None` for anything that is not a strict calendar date.
pub fn parse_deadline(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !ISO_DATE_RE.is_match(trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DEADLINE_FORMAT).ok()
}

/// User-entered fields for add/edit actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub deadline: String,
}

impl TaskDraft {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            deadline: deadline.into(),
        }
    }

    /// Validates and normalizes the draft.
    ///
    /// # Errors
    /// - `EmptyTitle` when the trimmed title is empty.
    /// - `MissingDeadline` / `InvalidDeadline` when the deadline does not parse.
    pub fn validate(&self) -> Result<ValidDraft, TaskValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }

        let deadline_text = self.deadline.trim();
        if deadline_text.is_empty() {
            return Err(TaskValidationError::MissingDeadline);
        }
        let deadline = parse_deadline(deadline_text)
            .ok_or_else(|| TaskValidationError::InvalidDeadline(deadline_text.to_string()))?;

        Ok(ValidDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            deadline,
        })
    }
}

/// Draft that passed validation; the only input accepted by task builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Kept as text so stored values that fail to parse survive round-trips.
    pub deadline: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    /// Unix epoch milliseconds. Informational only.
    pub created_at: i64,
}

impl Task {
    /// Builds a new task from a validated draft.
    ///
    /// # Invariants
    /// - A fresh v4 id is generated.
    /// - `completed` starts as `false`.
    pub fn from_draft(draft: ValidDraft, priority: Priority, created_at: i64) -> Self {
        Self::with_id(Uuid::new_v4(), draft, priority, created_at)
    }

    /// Builds a task with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(id: TaskId, draft: ValidDraft, priority: Priority, created_at: i64) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            deadline: draft.deadline.format(DEADLINE_FORMAT).to_string(),
            priority,
            completed: false,
            created_at,
        }
    }

    /// Validates record-level invariants enforced on every storage write.
    ///
    /// Deadlines are not checked here: stored records may carry legacy text
    /// that the view layer hides instead of rejecting.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Returns the parsed deadline, or `None` when the stored text is invalid.
    pub fn deadline_date(&self) -> Option<NaiveDate> {
        parse_deadline(&self.deadline)
    }

    /// Replaces editable fields; priority must be recomputed by the caller.
    pub fn apply_draft(&mut self, draft: ValidDraft, priority: Priority) {
        self.title = draft.title;
        self.description = draft.description;
        self.deadline = draft.deadline.format(DEADLINE_FORMAT).to_string();
        self.priority = priority;
    }

    /// Marks this task completed.
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Returns whether the task still accepts edit/complete actions.
    pub fn is_editable(&self) -> bool {
        !self.completed
    }
}
