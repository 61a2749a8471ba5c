use chrono::{DateTime, Days, TimeZone, Utc};
use std::cell::{Cell, RefCell};
use taskboard_core::db::open_db_in_memory;
use taskboard_core::{
    ActionOutcome, BoardControl, BoardError, ChangeFeed, FixedClock, JsonFileConfigProvider,
    Notice, Priority, RepoError, RepoResult, SqliteTaskRepository, StaticConfigProvider, Task,
    TaskBoard, TaskDraft, TaskId, TaskRepository, TaskValidationError, MAX_TASKS,
    REVIEW_PENDING_TITLE,
};
use uuid::Uuid;

/// In-memory storage collaborator that counts writes and can be told to fail.
#[derive(Default)]
struct MemoryRepo {
    tasks: RefCell<Vec<Task>>,
    feed: Option<ChangeFeed>,
    writes: Cell<usize>,
    fail_writes: Cell<bool>,
}

impl MemoryRepo {
    fn seeded(tasks: Vec<Task>) -> Self {
        Self {
            tasks: RefCell::new(tasks),
            ..Self::default()
        }
    }

    fn publish(&self) {
        if let Some(feed) = &self.feed {
            feed.publish(self.tasks.borrow().clone());
        }
    }

    fn begin_write(&self) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(RepoError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

impl TaskRepository for MemoryRepo {
    fn init(&mut self, feed: ChangeFeed) -> RepoResult<()> {
        self.feed = Some(feed);
        self.publish();
        Ok(())
    }

    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        self.begin_write()?;
        self.tasks.borrow_mut().push(task.clone());
        self.publish();
        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        self.begin_write()?;
        {
            let mut tasks = self.tasks.borrow_mut();
            let slot = tasks
                .iter_mut()
                .find(|existing| existing.id == task.id)
                .ok_or(RepoError::NotFound(task.id))?;
            *slot = task.clone();
        }
        self.publish();
        Ok(())
    }

    fn list_tasks(&self) -> RepoResult<Vec<Task>> {
        Ok(self.tasks.borrow().clone())
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn date_in(days: u64) -> String {
    now()
        .date_naive()
        .checked_add_days(Days::new(days))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string()
}

fn stored_task(title: &str, completed: bool) -> Task {
    Task {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        deadline: date_in(14),
        priority: Priority::Least,
        completed,
        created_at: 0,
    }
}

fn started_board(repo: MemoryRepo) -> TaskBoard<MemoryRepo, FixedClock> {
    let mut board = TaskBoard::with_clock(repo, FixedClock(now()));
    board.start().unwrap();
    board
}

#[test]
fn start_loads_and_sorts_existing_tasks() {
    let mut urgent = stored_task("urgent", false);
    urgent.priority = Priority::Immediate;
    let board = started_board(MemoryRepo::seeded(vec![
        stored_task("later", false),
        urgent.clone(),
    ]));

    assert_eq!(board.state().tasks.len(), 2);
    assert_eq!(board.state().tasks[0].id, urgent.id);
}

#[test]
fn actions_before_start_are_rejected() {
    let mut board = TaskBoard::with_clock(MemoryRepo::default(), FixedClock(now()));

    let err = board
        .add_task(&TaskDraft::new("Submit report", "", date_in(3)))
        .unwrap_err();
    assert!(matches!(err, BoardError::NotStarted));
    assert!(matches!(
        board.complete_task(Uuid::new_v4()),
        Err(BoardError::NotStarted)
    ));
}

#[test]
fn add_task_classifies_and_stores() {
    let mut board = started_board(MemoryRepo::default());

    let outcome = board
        .add_task(&TaskDraft::new("Submit report", "quarterly numbers", date_in(3)))
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Applied);
    let tasks = &board.state().tasks;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Submit report");
    assert_eq!(tasks[0].priority, Priority::Important);
    assert!(!tasks[0].completed);
    assert_eq!(tasks[0].created_at, now().timestamp_millis());
    assert_eq!(board.last_created(), Some(tasks[0].id));
    assert_eq!(board.repository().writes.get(), 1);
    assert!(board.state().notice.is_none());
}

#[test]
fn add_task_trims_title() {
    let mut board = started_board(MemoryRepo::default());

    board
        .add_task(&TaskDraft::new("  Buy groceries  ", "", date_in(14)))
        .unwrap();

    assert_eq!(board.state().tasks[0].title, "Buy groceries");
    assert_eq!(board.state().tasks[0].priority, Priority::Least);
}

#[test]
fn invalid_drafts_never_reach_storage() {
    let mut board = started_board(MemoryRepo::default());

    let blank = board.add_task(&TaskDraft::new("   ", "", date_in(3)));
    assert!(matches!(
        blank,
        Err(BoardError::Validation(TaskValidationError::EmptyTitle))
    ));
    assert!(matches!(board.state().notice, Some(Notice::Validation(_))));

    let no_deadline = board.add_task(&TaskDraft::new("Submit report", "", ""));
    assert!(matches!(
        no_deadline,
        Err(BoardError::Validation(TaskValidationError::MissingDeadline))
    ));

    let bad_deadline = board.add_task(&TaskDraft::new("Submit report", "", "next week"));
    assert!(matches!(
        bad_deadline,
        Err(BoardError::Validation(TaskValidationError::InvalidDeadline(_)))
    ));

    assert_eq!(board.repository().writes.get(), 0);
    assert!(board.state().tasks.is_empty());
}

#[test]
fn add_task_stops_at_limit() {
    let seeded = (0..MAX_TASKS)
        .map(|index| stored_task(&format!("task {index}"), false))
        .collect();
    let mut board = started_board(MemoryRepo::seeded(seeded));

    let err = board
        .add_task(&TaskDraft::new("One more", "", date_in(3)))
        .unwrap_err();

    assert!(matches!(err, BoardError::LimitReached { limit } if limit == MAX_TASKS));
    assert_eq!(board.state().notice, Some(Notice::LimitReached));
    assert_eq!(board.repository().writes.get(), 0);
    assert_eq!(board.state().tasks.len(), MAX_TASKS);

    let view = board.render();
    assert!(view.limit_warning.is_some());
}

#[test]
fn writes_are_inert_while_another_is_in_flight() {
    let existing = stored_task("existing", false);
    let mut board = started_board(MemoryRepo::seeded(vec![existing.clone()]));
    board.state_mut().in_flight = Some(BoardControl::AddTask);

    let added = board
        .add_task(&TaskDraft::new("Submit report", "", date_in(3)))
        .unwrap();
    let completed = board.complete_task(existing.id).unwrap();

    assert_eq!(added, ActionOutcome::Ignored);
    assert_eq!(completed, ActionOutcome::Ignored);
    assert_eq!(board.repository().writes.get(), 0);
    assert_eq!(board.state().tasks, vec![existing]);
}

#[test]
fn busy_board_ignores_invalid_drafts_without_touching_notice() {
    let existing = stored_task("existing", false);
    let mut board = started_board(MemoryRepo::seeded(vec![existing.clone()]));
    board.state_mut().in_flight = Some(BoardControl::AddTask);

    let added = board.add_task(&TaskDraft::new("", "", "")).unwrap();
    let saved = board
        .save_edit(existing.id, &TaskDraft::new("  ", "", "not a date"))
        .unwrap();

    assert_eq!(added, ActionOutcome::Ignored);
    assert_eq!(saved, ActionOutcome::Ignored);
    assert!(board.state().notice.is_none());
    assert_eq!(board.repository().writes.get(), 0);
}

#[test]
fn storage_failure_leaves_state_unchanged() {
    let existing = stored_task("existing", false);
    let repo = MemoryRepo::seeded(vec![existing.clone()]);
    repo.fail_writes.set(true);
    let mut board = started_board(repo);

    let added = board
        .add_task(&TaskDraft::new("Submit report", "", date_in(3)))
        .unwrap();
    let completed = board.complete_task(existing.id).unwrap();

    assert_eq!(added, ActionOutcome::StorageFailed);
    assert_eq!(completed, ActionOutcome::StorageFailed);
    assert_eq!(board.state().tasks, vec![existing]);
    assert_eq!(board.state().notice, Some(Notice::StorageFailed));
    assert!(board.state().in_flight.is_none());
    assert!(board.last_created().is_none());
}

#[test]
fn only_one_task_is_edited_at_a_time() {
    let first = stored_task("first", false);
    let second = stored_task("second", false);
    let mut board = started_board(MemoryRepo::seeded(vec![first.clone(), second.clone()]));

    assert_eq!(board.begin_edit(first.id), ActionOutcome::Applied);
    assert_eq!(board.begin_edit(second.id), ActionOutcome::Applied);
    assert_eq!(board.state().editing, Some(second.id));

    assert_eq!(board.begin_edit(Uuid::new_v4()), ActionOutcome::Ignored);
    assert_eq!(board.state().editing, Some(second.id));

    assert_eq!(board.cancel_edit(), ActionOutcome::Applied);
    assert_eq!(board.state().editing, None);
    assert_eq!(board.cancel_edit(), ActionOutcome::Ignored);
}

#[test]
fn save_edit_recomputes_priority_and_leaves_edit_mode() {
    let mut board = started_board(MemoryRepo::default());
    board
        .add_task(&TaskDraft::new("Buy groceries", "", date_in(14)))
        .unwrap();
    let id = board.last_created().unwrap();
    assert_eq!(board.state().tasks[0].priority, Priority::Least);

    board.begin_edit(id);
    let outcome = board
        .save_edit(id, &TaskDraft::new("Buy groceries ASAP", "", date_in(14)))
        .unwrap();

    assert_eq!(outcome, ActionOutcome::Applied);
    let task = board.state().find_task(id).unwrap();
    assert_eq!(task.title, "Buy groceries ASAP");
    assert_eq!(task.priority, Priority::Immediate);
    assert_eq!(board.state().editing, None);
}

#[test]
fn saving_unchanged_fields_keeps_priority() {
    let mut board = started_board(MemoryRepo::default());
    let draft = TaskDraft::new("Team meeting", "agenda", date_in(20));
    board.add_task(&draft).unwrap();
    let id = board.last_created().unwrap();
    let before = board.state().find_task(id).unwrap().clone();

    board.begin_edit(id);
    board.save_edit(id, &draft).unwrap();

    let after = board.state().find_task(id).unwrap();
    assert_eq!(after, &before);
    assert_eq!(after.priority, Priority::Important);
}

#[test]
fn invalid_edit_keeps_edit_mode() {
    let task = stored_task("first", false);
    let mut board = started_board(MemoryRepo::seeded(vec![task.clone()]));
    board.begin_edit(task.id);

    let result = board.save_edit(task.id, &TaskDraft::new("", "", date_in(3)));

    assert!(matches!(result, Err(BoardError::Validation(_))));
    assert_eq!(board.state().editing, Some(task.id));
    assert_eq!(board.repository().writes.get(), 0);
}

#[test]
fn complete_is_terminal() {
    let task = stored_task("finish me", false);
    let other = stored_task("other", false);
    let mut board = started_board(MemoryRepo::seeded(vec![task.clone(), other]));
    assert_eq!(board.state().incomplete_count(), 2);

    assert_eq!(
        board.complete_task(task.id).unwrap(),
        ActionOutcome::Applied
    );
    assert!(board.state().find_task(task.id).unwrap().completed);
    assert_eq!(board.state().incomplete_count(), 1);

    assert_eq!(board.complete_task(task.id).unwrap(), ActionOutcome::Ignored);
    assert_eq!(board.begin_edit(task.id), ActionOutcome::Ignored);
    assert_eq!(
        board
            .save_edit(task.id, &TaskDraft::new("reopen", "", date_in(3)))
            .unwrap(),
        ActionOutcome::Ignored
    );
    assert_eq!(board.repository().writes.get(), 1);
}

#[test]
fn completing_a_task_drops_it_from_suggestion_counts() {
    let first = stored_task("a", false);
    let mut board = started_board(MemoryRepo::seeded(vec![
        first.clone(),
        stored_task("b", false),
        stored_task("c", false),
    ]));
    let titles: Vec<_> = board
        .suggestions()
        .into_iter()
        .map(|suggestion| suggestion.title)
        .collect();
    assert_eq!(titles, vec![REVIEW_PENDING_TITLE.to_string()]);

    board.complete_task(first.id).unwrap();

    assert!(board.suggestions().is_empty());
}

#[test]
fn completing_the_edited_task_leaves_edit_mode() {
    let task = stored_task("editing", false);
    let mut board = started_board(MemoryRepo::seeded(vec![task.clone()]));
    board.begin_edit(task.id);

    board.complete_task(task.id).unwrap();

    assert_eq!(board.state().editing, None);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let mut board = started_board(MemoryRepo::seeded(vec![stored_task("only", false)]));
    let ghost = Uuid::new_v4();

    assert_eq!(board.complete_task(ghost).unwrap(), ActionOutcome::Ignored);
    assert_eq!(
        board
            .save_edit(ghost, &TaskDraft::new("ghost", "", date_in(3)))
            .unwrap(),
        ActionOutcome::Ignored
    );
    assert_eq!(board.repository().writes.get(), 0);
}

#[test]
fn accepting_a_suggestion_creates_a_classified_task() {
    let mut board = started_board(MemoryRepo::seeded(vec![
        stored_task("a", false),
        stored_task("b", false),
        stored_task("c", false),
    ]));

    let suggestions = board.suggestions();
    assert_eq!(suggestions[0].title, REVIEW_PENDING_TITLE);

    let outcome = board.accept_suggestion(&suggestions[0]).unwrap();

    assert_eq!(outcome, ActionOutcome::Applied);
    assert_eq!(board.state().tasks.len(), 4);
    let accepted = board
        .state()
        .find_task(board.last_created().unwrap())
        .unwrap();
    assert_eq!(accepted.title, REVIEW_PENDING_TITLE);
    assert_eq!(accepted.deadline, date_in(1));
    assert_eq!(accepted.priority, Priority::Immediate);
    assert_eq!(board.state().tasks[0].id, accepted.id);
}

#[test]
fn dark_mode_toggles() {
    let mut board = started_board(MemoryRepo::default());

    assert!(board.toggle_dark_mode());
    assert!(board.render().theme.dark_mode);
    assert!(!board.toggle_dark_mode());
    board.set_dark_mode(true);
    assert!(board.state().dark_mode);
}

#[test]
fn configure_applies_provider_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("display.json");
    std::fs::write(&path, r#"{"app_title": "Team Board", "font_size": 14}"#).unwrap();
    let mut board = started_board(MemoryRepo::default());

    board
        .configure(&mut JsonFileConfigProvider::new(&path))
        .unwrap();
    assert_eq!(board.config().app_title, "Team Board");
    assert_eq!(board.render().title, "Team Board");

    board.configure(&mut StaticConfigProvider).unwrap();
    assert_eq!(board.config().app_title, "Smart Task Manager");
}

#[test]
fn configure_surfaces_malformed_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("display.json");
    std::fs::write(&path, "{").unwrap();
    let mut board = started_board(MemoryRepo::default());

    let err = board
        .configure(&mut JsonFileConfigProvider::new(&path))
        .unwrap_err();
    assert!(matches!(err, BoardError::Config(_)));
    assert_eq!(board.config().app_title, "Smart Task Manager");
}

#[test]
fn sqlite_backed_board_survives_restart() {
    let conn = open_db_in_memory().unwrap();
    let created_id = {
        let repo = SqliteTaskRepository::try_new(&conn).unwrap();
        let mut board = TaskBoard::with_clock(repo, FixedClock(now()));
        board.start().unwrap();
        board
            .add_task(&TaskDraft::new("Buy groceries", "", date_in(14)))
            .unwrap();
        board
            .add_task(&TaskDraft::new("Fix outage", "critical", date_in(30)))
            .unwrap();
        let id = board.last_created().unwrap();
        board.complete_task(id).unwrap();
        id
    };

    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    let mut board = TaskBoard::with_clock(repo, FixedClock(now()));
    board.start().unwrap();

    let tasks = &board.state().tasks;
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].id, created_id);
    assert_eq!(tasks[0].priority, Priority::Immediate);
    assert!(tasks[0].completed);
    assert_eq!(tasks[1].title, "Buy groceries");
}
