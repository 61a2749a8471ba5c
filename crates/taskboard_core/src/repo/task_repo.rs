//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage collaborator contract consumed by the board.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Tasks are listed in insertion order (`position ASC`).
//! - Every successful write publishes the full collection on the change feed;
//!   a failed re-read is logged and does not undo the committed write.
//! - Updates for unknown ids return `NotFound` and publish nothing.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::task::{Priority, Task, TaskId, TaskValidationError};
use crate::repo::feed::ChangeFeed;
use log::{debug, info, warn};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    deadline,
    priority,
    completed,
    created_at
FROM tasks";

const REQUIRED_TASK_COLUMNS: &[&str] = &[
    "id",
    "position",
    "title",
    "description",
    "deadline",
    "priority",
    "completed",
    "created_at",
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence and change publication.
#[derive(Debug)]
pub enum RepoError {
    Validation(TaskValidationError),
    Db(DbError),
    Io(std::io::Error),
    Serialization(serde_json::Error),
    NotFound(TaskId),
    DuplicateId(TaskId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "task store I/O failed: {err}"),
            Self::Serialization(err) => write!(f, "task store encoding failed: {err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateId(id) => write!(f, "task id already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for RepoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Storage collaborator contract.
///
/// Implementations own persistence and push the full collection to the
/// registered feed once on `init` and after every successful write.
pub trait TaskRepository {
    /// Registers the change feed and publishes the current collection.
    fn init(&mut self, feed: ChangeFeed) -> RepoResult<()>;
    /// Appends one task.
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    /// Replaces the task with the same id.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    /// Returns every stored task in storage order.
    fn list_tasks(&self) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
    feed: Option<ChangeFeed>,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` for foreign schemas.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, feed: None })
    }

    fn publish(&self, event: &'static str) -> RepoResult<()> {
        let Some(feed) = &self.feed else {
            return Ok(());
        };
        let tasks = self.list_tasks()?;
        debug!(
            "event=data_changed module=repo status=ok trigger={event} count={}",
            tasks.len()
        );
        feed.publish(tasks);
        Ok(())
    }

    /// Publishes after a committed write; a failed re-read never fails the write.
    fn publish_committed(&self, event: &'static str) {
        if let Err(err) = self.publish(event) {
            warn!("event=data_changed module=repo status=error trigger={event} error={err}");
        }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn init(&mut self, feed: ChangeFeed) -> RepoResult<()> {
        self.feed = Some(feed);
        info!("event=store_init module=repo status=ok backend=sqlite");
        self.publish("init")
    }

    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO tasks (
                id,
                position,
                title,
                description,
                deadline,
                priority,
                completed,
                created_at
            )
            SELECT ?1, COALESCE(MAX(position), -1) + 1, ?2, ?3, ?4, ?5, ?6, ?7
            FROM tasks;",
            params![
                task.id.to_string(),
                task.title.as_str(),
                task.description.as_str(),
                task.deadline.as_str(),
                task.priority.as_str(),
                bool_to_int(task.completed),
                task.created_at,
            ],
        );

        match inserted {
            Ok(_) => {}
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                return Err(RepoError::DuplicateId(task.id));
            }
            Err(err) => return Err(err.into()),
        }

        self.publish_committed("create");
        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                title = ?1,
                description = ?2,
                deadline = ?3,
                priority = ?4,
                completed = ?5,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?6;",
            params![
                task.title.as_str(),
                task.description.as_str(),
                task.deadline.as_str(),
                task.priority.as_str(),
                bool_to_int(task.completed),
                task.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        self.publish_committed("update");
        Ok(())
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} ORDER BY position ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('tasks');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if columns.is_empty() {
        return Err(RepoError::MissingRequiredTable("tasks"));
    }

    for &column in REQUIRED_TASK_COLUMNS {
        if !columns.iter().any(|name| name.as_str() == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: "tasks",
                column,
            });
        }
    }

    Ok(())
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{id_text}` in tasks.id")))?;

    let priority_text: String = row.get("priority")?;
    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    Ok(Task {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        deadline: row.get("deadline")?,
        priority: Priority::from_stored(&priority_text),
        completed,
        created_at: row.get("created_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
