//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose board actions and read models to Dart via FRB.
//! - Flatten core outcomes into simple response envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the board, applies one action, and closes it again;
//!   edit mode and dark mode are owned by the Dart side.

use log::error;
use std::path::PathBuf;
use std::sync::OnceLock;
use taskboard_core::db::open_db;
use taskboard_core::{
    core_version as core_version_inner, format_deadline, init_logging as init_logging_inner,
    ping as ping_inner, ActionOutcome, BoardBody, BoardError, BoardItem, SqliteTaskRepository,
    TaskBoard, TaskDraft, TaskId,
};
use uuid::Uuid;

const BOARD_DB_FILE_NAME: &str = "taskboard.sqlite3";
static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Action response envelope for board mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the action took effect.
    pub ok: bool,
    /// Affected task ID, when one exists.
    pub task_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
}

impl BoardActionResponse {
    fn success(message: impl Into<String>, task_id: Option<TaskId>) -> Self {
        Self {
            ok: true,
            task_id: task_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            task_id: None,
            message: message.into(),
        }
    }
}

/// One task card row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardTaskItem {
    pub task_id: String,
    pub title: String,
    pub description: String,
    /// Raw `YYYY-MM-DD` deadline.
    pub deadline: String,
    /// Display-formatted deadline.
    pub deadline_label: String,
    /// `immediate|important|least|unknown`.
    pub priority: String,
    pub priority_label: String,
    pub overdue: bool,
    pub completed: bool,
    /// Whether this row should render as the edit form.
    pub editing: bool,
}

/// One AI suggestion row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSuggestionItem {
    pub title: String,
    pub description: String,
    /// Display-formatted deadline.
    pub deadline_label: String,
}

/// Read model envelope for the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshotResponse {
    /// Priority-sorted tasks; rows with unreadable deadlines are omitted.
    pub tasks: Vec<BoardTaskItem>,
    pub suggestions: Vec<BoardSuggestionItem>,
    /// Limit warning banner text, when the board is full.
    pub limit_warning: Option<String>,
    /// Empty-state placeholder text, when nothing is on the board.
    pub empty_message: Option<String>,
    /// Human-readable message for diagnostics.
    pub message: String,
}

/// Adds a task; priority is inferred by core.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Returns the created task ID on success.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(
    title: String,
    description: String,
    deadline: String,
) -> BoardActionResponse {
    let draft = TaskDraft::new(title, description, deadline);
    with_board(|board| {
        let outcome = board.add_task(&draft);
        let created = board.last_created();
        respond(outcome, "Task added.", created)
    })
}

/// Saves edited task fields and recomputes priority.
#[flutter_rust_bridge::frb(sync)]
pub fn board_update_task(
    task_id: String,
    title: String,
    description: String,
    deadline: String,
) -> BoardActionResponse {
    let Some(id) = parse_task_id(&task_id) else {
        return BoardActionResponse::failure(format!("invalid task id `{task_id}`"));
    };
    let draft = TaskDraft::new(title, description, deadline);
    with_board(|board| respond(board.save_edit(id, &draft), "Task updated.", Some(id)))
}

/// Marks a task completed.
#[flutter_rust_bridge::frb(sync)]
pub fn board_complete_task(task_id: String) -> BoardActionResponse {
    let Some(id) = parse_task_id(&task_id) else {
        return BoardActionResponse::failure(format!("invalid task id `{task_id}`"));
    };
    with_board(|board| respond(board.complete_task(id), "Task completed.", Some(id)))
}

/// Promotes the current suggestion with `title` into a task.
#[flutter_rust_bridge::frb(sync)]
pub fn board_accept_suggestion(title: String) -> BoardActionResponse {
    with_board(|board| {
        let Some(suggestion) = board
            .suggestions()
            .into_iter()
            .find(|suggestion| suggestion.title == title)
        else {
            return BoardActionResponse::failure("Suggestion is no longer available.");
        };
        let outcome = board.accept_suggestion(&suggestion);
        let created = board.last_created();
        respond(outcome, "Suggestion added.", created)
    })
}

/// Lists the board for rendering.
///
/// `editing_task_id` marks the row Dart currently shows as an edit form.
#[flutter_rust_bridge::frb(sync)]
pub fn board_list(editing_task_id: Option<String>) -> BoardSnapshotResponse {
    let editing = editing_task_id.as_deref().and_then(parse_task_id);
    let result = open_board_and(|board| {
        if let Some(id) = editing {
            board.begin_edit(id);
        }
        snapshot(board)
    });

    match result {
        Ok(response) => response,
        Err(err) => BoardSnapshotResponse {
            tasks: Vec::new(),
            suggestions: Vec::new(),
            limit_warning: None,
            empty_message: None,
            message: format!("board_list failed: {err}"),
        },
    }
}

fn snapshot(board: &TaskBoard<SqliteTaskRepository<'_>>) -> BoardSnapshotResponse {
    let view = board.render();
    let state = board.state();

    let mut tasks = Vec::new();
    let mut suggestions = Vec::new();
    let empty_message = match view.body {
        BoardBody::Empty { message } => Some(message),
        BoardBody::Items { items } => {
            for item in items {
                match item {
                    BoardItem::Suggestion(card) => suggestions.push(BoardSuggestionItem {
                        title: card.title,
                        description: card.description,
                        deadline_label: card.deadline_label,
                    }),
                    BoardItem::Editor(editor) => {
                        if let Some(task) = state.find_task(editor.id) {
                            tasks.push(BoardTaskItem {
                                task_id: task.id.to_string(),
                                title: task.title.clone(),
                                description: task.description.clone(),
                                deadline: task.deadline.clone(),
                                deadline_label: task
                                    .deadline_date()
                                    .map(format_deadline)
                                    .unwrap_or_default(),
                                priority: task.priority.as_str().to_string(),
                                priority_label: task.priority.label().to_string(),
                                overdue: false,
                                completed: task.completed,
                                editing: true,
                            });
                        }
                    }
                    BoardItem::Task(card) => tasks.push(BoardTaskItem {
                        task_id: card.id.to_string(),
                        deadline: state
                            .find_task(card.id)
                            .map(|task| task.deadline.clone())
                            .unwrap_or_default(),
                        title: card.title,
                        description: card.description,
                        deadline_label: card.deadline_label,
                        priority: card.priority.as_str().to_string(),
                        priority_label: card.priority_label,
                        overdue: card.overdue,
                        completed: card.completed,
                        editing: false,
                    }),
                }
            }
            None
        }
    };

    BoardSnapshotResponse {
        message: format!("Loaded {} task(s).", tasks.len()),
        tasks,
        suggestions,
        limit_warning: view.limit_warning,
        empty_message,
    }
}

fn respond(
    outcome: Result<ActionOutcome, BoardError>,
    applied_message: &str,
    task_id: Option<TaskId>,
) -> BoardActionResponse {
    match outcome {
        Ok(ActionOutcome::Applied) => BoardActionResponse::success(applied_message, task_id),
        Ok(ActionOutcome::Ignored) => {
            BoardActionResponse::failure("No matching editable task; nothing changed.")
        }
        Ok(ActionOutcome::StorageFailed) => {
            BoardActionResponse::failure("Could not save changes. Please try again.")
        }
        Err(err) => BoardActionResponse::failure(err.to_string()),
    }
}

fn parse_task_id(value: &str) -> Option<TaskId> {
    Uuid::parse_str(value.trim()).ok()
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if cfg!(test) {
                return std::env::temp_dir().join(format!(
                    "taskboard-ffi-test-{}.sqlite3",
                    std::process::id()
                ));
            }
            if let Ok(raw) = std::env::var("TASKBOARD_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_board(
    f: impl FnOnce(&mut TaskBoard<SqliteTaskRepository<'_>>) -> BoardActionResponse,
) -> BoardActionResponse {
    open_board_and(f).unwrap_or_else(BoardActionResponse::failure)
}

fn open_board_and<T>(
    f: impl FnOnce(&mut TaskBoard<SqliteTaskRepository<'_>>) -> T,
) -> Result<T, String> {
    let db_path = resolve_board_db_path();
    let conn = open_db(&db_path).map_err(|err| board_open_failed("db_open_failed", err))?;
    let repo = SqliteTaskRepository::try_new(&conn)
        .map_err(|err| board_open_failed("repo_init_failed", err))?;
    let mut board = TaskBoard::new(repo);
    board
        .start()
        .map_err(|err| board_open_failed("board_start_failed", err))?;
    Ok(f(&mut board))
}

fn board_open_failed(error_code: &'static str, err: impl std::fmt::Display) -> String {
    error!("event=ffi_board_open module=ffi status=error error_code={error_code}");
    format!("{error_code}: {err}")
}
