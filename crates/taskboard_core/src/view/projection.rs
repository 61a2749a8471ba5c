//! Declarative board view projection.
//!
//! # Responsibility
//! - Turn board state, suggestions and display config into a view model a
//!   UI shell can draw without further decisions.
//!
//! # Invariants
//! - Pure: the same inputs always produce the same view.
//! - Tasks with unparseable deadlines are omitted from the view only.
//! - Completed tasks never expose enabled edit/complete controls.
//! - A board with nothing visible renders one placeholder.

use crate::model::suggestion::Suggestion;
use crate::model::task::{Priority, Task, TaskId, MAX_TASKS};
use crate::rules::classifier::deadline_instant;
use crate::state::{AppState, BoardControl};
use crate::view::config::DisplayConfig;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

const DEADLINE_DISPLAY_FORMAT: &str = "%b %-d, %Y";
const EMPTY_STATE_MESSAGE: &str = "No tasks yet. Add your first task to get started!";

const DARK_BACKGROUND_COLOR: &str = "#0f172a";
const DARK_SURFACE_COLOR: &str = "#1e293b";
const DARK_TEXT_COLOR: &str = "#f1f5f9";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub title: String,
    pub welcome_message: String,
    pub theme: Theme,
    pub add_button: ButtonView,
    /// Present once the board holds `MAX_TASKS` tasks. Does not hide the list.
    pub limit_warning: Option<String>,
    pub notice: Option<String>,
    pub body: BoardBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub dark_mode: bool,
    pub background_color: String,
    pub surface_color: String,
    pub text_color: String,
    pub primary_action_color: String,
    pub secondary_action_color: String,
    pub font_family: String,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardBody {
    Empty { message: String },
    Items { items: Vec<BoardItem> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardItem {
    Suggestion(SuggestionCard),
    Editor(TaskEditor),
    Task(TaskCard),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub deadline_label: String,
    pub accept: ButtonView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEditor {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Raw `YYYY-MM-DD` value for the date input.
    pub deadline: String,
    pub save: ButtonView,
    pub cancel: ButtonView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskCard {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub deadline_label: String,
    pub priority: Priority,
    pub priority_label: String,
    pub overdue: bool,
    pub completed: bool,
    pub edit: ButtonView,
    pub complete: ButtonView,
}

/// Projects the board into a view model.
pub fn project(
    state: &AppState,
    suggestions: &[Suggestion],
    config: &DisplayConfig,
    now: DateTime<Utc>,
) -> BoardView {
    let busy = state.is_busy();
    let add_label = if state.in_flight == Some(BoardControl::AddTask) {
        "Adding...".to_string()
    } else {
        config.add_task_button.clone()
    };

    let mut items = Vec::with_capacity(suggestions.len() + state.tasks.len());
    items.extend(
        suggestions
            .iter()
            .map(|suggestion| BoardItem::Suggestion(suggestion_card(state, suggestion))),
    );
    items.extend(
        state
            .tasks
            .iter()
            .filter_map(|task| task_item(state, task, config, now)),
    );
    let body = if items.is_empty() {
        BoardBody::Empty {
            message: EMPTY_STATE_MESSAGE.to_string(),
        }
    } else {
        BoardBody::Items { items }
    };

    BoardView {
        title: config.app_title.clone(),
        welcome_message: config.welcome_message.clone(),
        theme: theme(config, state.dark_mode),
        add_button: ButtonView {
            label: add_label,
            enabled: !busy,
        },
        limit_warning: (state.tasks.len() >= MAX_TASKS).then(|| {
            format!("You have reached the limit of {MAX_TASKS} tasks. New tasks cannot be added.")
        }),
        notice: state.notice.as_ref().map(|notice| notice.message()),
        body,
    }
}

/// Formats a deadline for cards, e.g. `Oct 21, 2026`.
pub fn format_deadline(deadline: NaiveDate) -> String {
    deadline.format(DEADLINE_DISPLAY_FORMAT).to_string()
}

fn theme(config: &DisplayConfig, dark_mode: bool) -> Theme {
    let (background, surface, text) = if dark_mode {
        (
            DARK_BACKGROUND_COLOR.to_string(),
            DARK_SURFACE_COLOR.to_string(),
            DARK_TEXT_COLOR.to_string(),
        )
    } else {
        (
            config.background_color.clone(),
            config.surface_color.clone(),
            config.text_color.clone(),
        )
    };

    Theme {
        dark_mode,
        background_color: background,
        surface_color: surface,
        text_color: text,
        primary_action_color: config.primary_action_color.clone(),
        secondary_action_color: config.secondary_action_color.clone(),
        font_family: config.font_family.clone(),
        font_size: config.font_size,
    }
}

fn suggestion_card(state: &AppState, suggestion: &Suggestion) -> SuggestionCard {
    let accepting = state.in_flight == Some(BoardControl::AcceptSuggestion(suggestion.id));
    SuggestionCard {
        id: suggestion.id.to_string(),
        title: suggestion.title.clone(),
        description: suggestion.description.clone(),
        deadline_label: format_deadline(suggestion.deadline),
        accept: ButtonView {
            label: if accepting { "Adding..." } else { "Add to Tasks" }.to_string(),
            enabled: !state.is_busy(),
        },
    }
}

fn task_item(
    state: &AppState,
    task: &Task,
    config: &DisplayConfig,
    now: DateTime<Utc>,
) -> Option<BoardItem> {
    let deadline = task.deadline_date()?;
    let busy = state.is_busy();

    if state.editing == Some(task.id) && task.is_editable() {
        let saving = state.in_flight == Some(BoardControl::SaveEdit(task.id));
        return Some(BoardItem::Editor(TaskEditor {
            id: task.id,
            title: task.title.clone(),
            description: task.description.clone(),
            deadline: task.deadline.clone(),
            save: ButtonView {
                label: if saving { "Saving..." } else { "Save" }.to_string(),
                enabled: !busy,
            },
            cancel: ButtonView {
                label: "Cancel".to_string(),
                enabled: !saving,
            },
        }));
    }

    let completing = state.in_flight == Some(BoardControl::Complete(task.id));
    let complete_label = if completing {
        "Completing...".to_string()
    } else if task.completed {
        "Completed".to_string()
    } else {
        config.complete_button.clone()
    };

    Some(BoardItem::Task(TaskCard {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        deadline_label: format_deadline(deadline),
        priority: task.priority,
        priority_label: task.priority.label().to_string(),
        overdue: deadline_instant(deadline) < now && !task.completed,
        completed: task.completed,
        edit: ButtonView {
            label: "Edit".to_string(),
            enabled: task.is_editable() && !busy,
        },
        complete: ButtonView {
            label: complete_label,
            enabled: task.is_editable() && !busy,
        },
    }))
}
