//! JSON snapshot task repository.
//!
//! # Responsibility
//! - Persist the whole ordered task list as one JSON document.
//!
//! # Invariants
//! - Every mutation rewrites the full document through a temp file + rename.
//! - A missing file reads as an empty collection.

use crate::model::task::{Task, TaskId};
use crate::repo::feed::ChangeFeed;
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use log::{debug, info};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed repository storing tasks as a JSON array.
pub struct JsonTaskRepository {
    path: PathBuf,
    feed: Option<ChangeFeed>,
}

impl JsonTaskRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            feed: None,
        }
    }

    /// Location of the snapshot document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RepoResult<Vec<Task>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, tasks: &[Task]) -> RepoResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let encoded = serde_json::to_string_pretty(tasks)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    fn publish(&self, event: &'static str, tasks: Vec<Task>) {
        if let Some(feed) = &self.feed {
            debug!(
                "event=data_changed module=repo status=ok trigger={event} count={}",
                tasks.len()
            );
            feed.publish(tasks);
        }
    }
}

impl TaskRepository for JsonTaskRepository {
    fn init(&mut self, feed: ChangeFeed) -> RepoResult<()> {
        let tasks = self.read_all()?;
        self.feed = Some(feed);
        info!(
            "event=store_init module=repo status=ok backend=json count={}",
            tasks.len()
        );
        self.publish("init", tasks);
        Ok(())
    }

    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;

        let mut tasks = self.read_all()?;
        if tasks.iter().any(|existing| existing.id == task.id) {
            return Err(RepoError::DuplicateId(task.id));
        }
        tasks.push(task.clone());
        self.write_all(&tasks)?;

        self.publish("create", tasks);
        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let mut tasks = self.read_all()?;
        let slot = tasks
            .iter_mut()
            .find(|existing| existing.id == task.id)
            .ok_or(RepoError::NotFound(task.id))?;
        *slot = task.clone();
        self.write_all(&tasks)?;

        self.publish("update", tasks);
        Ok(())
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        self.read_all()
    }
}
