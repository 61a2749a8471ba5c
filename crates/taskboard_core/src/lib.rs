//! Core domain logic for the task board.
//! This crate is the single source of truth for priority, ordering and
//! suggestion rules.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod rules;
pub mod service;
pub mod state;
pub mod view;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::suggestion::{Suggestion, SuggestionId};
pub use model::task::{
    parse_deadline, Priority, Task, TaskDraft, TaskId, TaskValidationError, ValidDraft, MAX_TASKS,
};
pub use repo::feed::{ChangeFeed, ChangeReceiver};
pub use repo::snapshot_repo::JsonTaskRepository;
pub use repo::task_repo::{RepoError, RepoResult, SqliteTaskRepository, TaskRepository};
pub use rules::classifier::{classify, days_until_deadline};
pub use rules::sorter::{sort_by_priority, sorted_by_priority};
pub use rules::suggestions::{generate_suggestions, REVIEW_PENDING_TITLE, WEEKLY_CHECK_TITLE};
pub use service::task_board::{build_task, ActionOutcome, BoardError, TaskBoard};
pub use state::{AppState, BoardControl, Notice};
pub use view::config::{
    ConfigError, ConfigProvider, DisplayConfig, JsonFileConfigProvider, StaticConfigProvider,
};
pub use view::projection::{
    format_deadline, project, BoardBody, BoardItem, BoardView, ButtonView, SuggestionCard,
    TaskCard, TaskEditor, Theme,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
