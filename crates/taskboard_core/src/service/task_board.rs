//! Task board use-case service.
//!
//! # Responsibility
//! - Own the explicit `AppState` and mutate it only through user actions and
//!   storage change notifications.
//! - Validate drafts, classify priority and write through the repository.
//!
//! # Invariants
//! - Priority is recomputed from title/description/deadline on every write
//!   that changes them; user input never sets it directly.
//! - `AppState::tasks` only changes when the storage feed publishes.
//! - While a write is in flight every other write action is inert.
//! - Lookup misses and completed targets are silent no-ops.

use crate::clock::{Clock, SystemClock};
use crate::model::suggestion::Suggestion;
use crate::model::task::{Task, TaskDraft, TaskId, TaskValidationError, ValidDraft, MAX_TASKS};
use crate::repo::feed::{ChangeFeed, ChangeReceiver};
use crate::repo::task_repo::{RepoError, RepoResult, TaskRepository};
use crate::rules::classifier::classify;
use crate::rules::sorter::sort_by_priority;
use crate::rules::suggestions::generate_suggestions;
use crate::state::{AppState, BoardControl, Notice};
use crate::view::config::{ConfigError, ConfigProvider, DisplayConfig};
use crate::view::projection::{project, BoardView};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of a user action that reached (or deliberately skipped) storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action took effect.
    Applied,
    /// Lookup miss, completed target, or another write already in flight.
    Ignored,
    /// The storage collaborator reported failure; nothing changed.
    StorageFailed,
}

/// Errors surfaced synchronously to the caller.
#[derive(Debug)]
pub enum BoardError {
    /// Draft failed validation; storage was not touched.
    Validation(TaskValidationError),
    /// The board already holds `limit` tasks.
    LimitReached { limit: usize },
    /// An action ran before `start` subscribed to storage.
    NotStarted,
    /// Storage failed during startup.
    Storage(RepoError),
    /// Display configuration could not be resolved.
    Config(ConfigError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::LimitReached { limit } => write!(f, "task limit of {limit} reached"),
            Self::NotStarted => write!(f, "task board has not been started"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Config(err) => Some(err),
            Self::LimitReached { .. } | Self::NotStarted => None,
        }
    }
}

impl From<TaskValidationError> for BoardError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Board facade over a storage collaborator.
pub struct TaskBoard<R: TaskRepository, C: Clock = SystemClock> {
    repo: R,
    clock: C,
    receiver: Option<ChangeReceiver>,
    state: AppState,
    config: DisplayConfig,
    last_created: Option<TaskId>,
}

impl<R: TaskRepository> TaskBoard<R> {
    /// Creates a board reading wall-clock time.
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, SystemClock)
    }
}

impl<R: TaskRepository, C: Clock> TaskBoard<R, C> {
    pub fn with_clock(repo: R, clock: C) -> Self {
        Self {
            repo,
            clock,
            receiver: None,
            state: AppState::default(),
            config: DisplayConfig::default(),
            last_created: None,
        }
    }

    /// Subscribes to the repository change feed and loads the initial tasks.
    pub fn start(&mut self) -> Result<(), BoardError> {
        let (feed, receiver) = ChangeFeed::channel();
        self.repo.init(feed).map_err(|err| {
            error!("event=board_start module=board status=error error={err}");
            BoardError::Storage(err)
        })?;
        self.receiver = Some(receiver);
        self.sync();
        info!(
            "event=board_start module=board status=ok count={}",
            self.state.tasks.len()
        );
        Ok(())
    }

    /// Resolves display configuration through `provider`.
    pub fn configure(&mut self, provider: &mut dyn ConfigProvider) -> Result<(), BoardError> {
        let mut effective = None;
        provider
            .init(DisplayConfig::default(), &mut |config: &DisplayConfig| {
                effective = Some(config.clone());
            })
            .map_err(BoardError::Config)?;
        if let Some(config) = effective {
            self.config = config;
        }
        Ok(())
    }

    /// Applies the latest snapshot published by storage, if any.
    ///
    /// Returns `true` when the task list was replaced.
    pub fn sync(&mut self) -> bool {
        let Some(receiver) = &self.receiver else {
            return false;
        };
        let Some(mut tasks) = receiver.try_iter().last() else {
            return false;
        };

        sort_by_priority(&mut tasks);
        self.state.tasks = tasks;

        if let Some(editing) = self.state.editing {
            let still_editable = self
                .state
                .find_task(editing)
                .is_some_and(Task::is_editable);
            if !still_editable {
                self.state.editing = None;
            }
        }
        debug!(
            "event=board_sync module=board status=ok count={}",
            self.state.tasks.len()
        );
        true
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Mutable state access for UI shells that track in-flight controls themselves.
    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Id of the most recent task created through this board.
    pub fn last_created(&self) -> Option<TaskId> {
        self.last_created
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Suggestions derived from the current tasks.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        generate_suggestions(&self.state.tasks, self.clock.now())
    }

    /// Renders the board with freshly generated suggestions.
    pub fn render(&self) -> BoardView {
        let now = self.clock.now();
        let suggestions = generate_suggestions(&self.state.tasks, now);
        project(&self.state, &suggestions, &self.config, now)
    }

    /// Adds a task from user input.
    ///
    /// Returns `Ignored` without validating while another write is in flight.
    ///
    /// # Errors
    /// - `Validation` for a blank title or missing/unparseable deadline.
    /// - `LimitReached` once the board holds `MAX_TASKS` tasks.
    pub fn add_task(&mut self, draft: &TaskDraft) -> Result<ActionOutcome, BoardError> {
        self.create_from_draft(draft, BoardControl::AddTask)
    }

    /// Promotes a suggestion into a regular task with a fresh priority.
    pub fn accept_suggestion(
        &mut self,
        suggestion: &Suggestion,
    ) -> Result<ActionOutcome, BoardError> {
        self.create_from_draft(
            &suggestion.to_draft(),
            BoardControl::AcceptSuggestion(suggestion.id),
        )
    }

    /// Enters edit mode for `id`, cancelling any other edit.
    pub fn begin_edit(&mut self, id: TaskId) -> ActionOutcome {
        match self.state.find_task(id) {
            Some(task) if task.is_editable() => {
                self.state.editing = Some(id);
                ActionOutcome::Applied
            }
            _ => ActionOutcome::Ignored,
        }
    }

    /// Leaves edit mode without saving.
    pub fn cancel_edit(&mut self) -> ActionOutcome {
        match self.state.editing.take() {
            Some(_) => ActionOutcome::Applied,
            None => ActionOutcome::Ignored,
        }
    }

    /// Saves edited fields and recomputes priority.
    ///
    /// # Errors
    /// - `Validation` for a blank title or missing/unparseable deadline.
    pub fn save_edit(
        &mut self,
        id: TaskId,
        draft: &TaskDraft,
    ) -> Result<ActionOutcome, BoardError> {
        self.ensure_started()?;
        if self.state.is_busy() {
            return Ok(ActionOutcome::Ignored);
        }
        let valid = self.validate(draft)?;

        let Some(mut task) = self.editable_task(id) else {
            return Ok(ActionOutcome::Ignored);
        };
        let priority = classify(
            &valid.title,
            &valid.description,
            valid.deadline,
            self.clock.now(),
        );
        task.apply_draft(valid, priority);

        let outcome = self.write(BoardControl::SaveEdit(id), |repo| repo.update_task(&task));
        if outcome == ActionOutcome::Applied {
            self.state.editing = None;
            info!(
                "event=task_update module=board status=ok priority={}",
                priority.as_str()
            );
        }
        Ok(outcome)
    }

    /// Marks a task completed. Completed tasks stay completed.
    pub fn complete_task(&mut self, id: TaskId) -> Result<ActionOutcome, BoardError> {
        self.ensure_started()?;
        let Some(mut task) = self.editable_task(id) else {
            return Ok(ActionOutcome::Ignored);
        };
        task.complete();

        let outcome = self.write(BoardControl::Complete(id), |repo| repo.update_task(&task));
        if outcome == ActionOutcome::Applied {
            if self.state.editing == Some(id) {
                self.state.editing = None;
            }
            info!("event=task_complete module=board status=ok");
        }
        Ok(outcome)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.state.dark_mode = enabled;
    }

    /// Flips dark mode and returns the new value.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.state.dark_mode = !self.state.dark_mode;
        self.state.dark_mode
    }

    fn create_from_draft(
        &mut self,
        draft: &TaskDraft,
        control: BoardControl,
    ) -> Result<ActionOutcome, BoardError> {
        self.ensure_started()?;
        if self.state.is_busy() {
            return Ok(ActionOutcome::Ignored);
        }
        let valid = self.validate(draft)?;
        if self.state.tasks.len() >= MAX_TASKS {
            warn!(
                "event=task_create module=board status=rejected error_code=limit_reached limit={MAX_TASKS}"
            );
            self.state.notice = Some(Notice::LimitReached);
            return Err(BoardError::LimitReached { limit: MAX_TASKS });
        }

        let now = self.clock.now();
        let task = build_task(valid, now);
        let priority = task.priority;
        let outcome = self.write(control, |repo| repo.create_task(&task).map(|_| ()));
        if outcome == ActionOutcome::Applied {
            self.last_created = Some(task.id);
            info!(
                "event=task_create module=board status=ok priority={} count={}",
                priority.as_str(),
                self.state.tasks.len()
            );
        }
        Ok(outcome)
    }

    fn validate(&mut self, draft: &TaskDraft) -> Result<ValidDraft, BoardError> {
        draft.validate().map_err(|err| {
            self.state.notice = Some(Notice::Validation(err.to_string()));
            BoardError::Validation(err)
        })
    }

    fn editable_task(&self, id: TaskId) -> Option<Task> {
        self.state
            .find_task(id)
            .filter(|task| task.is_editable())
            .cloned()
    }

    fn ensure_started(&self) -> Result<(), BoardError> {
        if self.receiver.is_none() {
            return Err(BoardError::NotStarted);
        }
        Ok(())
    }

    /// Runs one storage write with `control` marked in flight.
    fn write(
        &mut self,
        control: BoardControl,
        op: impl FnOnce(&R) -> RepoResult<()>,
    ) -> ActionOutcome {
        if self.state.is_busy() {
            debug!("event=board_write module=board status=skipped reason=busy");
            return ActionOutcome::Ignored;
        }

        self.state.in_flight = Some(control);
        let result = op(&self.repo);
        self.state.in_flight = None;

        match result {
            Ok(()) => {
                self.state.notice = None;
                self.sync();
                ActionOutcome::Applied
            }
            Err(RepoError::NotFound(_)) => {
                debug!("event=board_write module=board status=skipped reason=not_found");
                ActionOutcome::Ignored
            }
            Err(err) => {
                error!(
                    "event=board_write module=board status=error error_code=storage_failed error={err}"
                );
                self.state.notice = Some(Notice::StorageFailed);
                ActionOutcome::StorageFailed
            }
        }
    }
}

/// Builds a new task with a classifier-assigned priority.
pub fn build_task(draft: ValidDraft, now: DateTime<Utc>) -> Task {
    let priority = classify(&draft.title, &draft.description, draft.deadline, now);
    Task::from_draft(draft, priority, now.timestamp_millis())
}
