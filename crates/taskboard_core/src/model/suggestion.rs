//! Ephemeral advisory pseudo-tasks.
//!
//! Suggestions are regenerated on every render pass and never persisted.
//! Accepting one creates a regular [`Task`](crate::model::task::Task).

use crate::model::task::{TaskDraft, DEADLINE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one suggestion within a render pass.
pub type SuggestionId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: SuggestionId,
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    /// Always `true`; lets UI layers style suggestions apart from tasks.
    #[serde(rename = "isAI")]
    pub is_ai: bool,
}

impl Suggestion {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        deadline: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            deadline,
            is_ai: true,
        }
    }

    /// Converts this suggestion into a draft for the regular add path.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft::new(
            self.title.clone(),
            self.description.clone(),
            self.deadline.format(DEADLINE_FORMAT).to_string(),
        )
    }
}
