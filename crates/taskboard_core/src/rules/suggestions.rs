//! Advisory suggestion generation.
//!
//! # Invariants
//! - An empty board never produces suggestions.
//! - At most two suggestions; the pending review always precedes the weekly check.
//! - Ids are random per suggestion, so repeated calls never collide.

use crate::model::suggestion::Suggestion;
use crate::model::task::Task;
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Title of the suggestion emitted when too many tasks are open.
pub const REVIEW_PENDING_TITLE: &str = "Review pending tasks";
/// Title of the suggestion emitted for larger boards.
pub const WEEKLY_CHECK_TITLE: &str = "Weekly Progress Check";

const REVIEW_PENDING_THRESHOLD: usize = 2;
const WEEKLY_CHECK_THRESHOLD: usize = 5;

/// Derives suggestions from the current task collection.
pub fn generate_suggestions(tasks: &[Task], now: DateTime<Utc>) -> Vec<Suggestion> {
    if tasks.is_empty() {
        return Vec::new();
    }

    let today = now.date_naive();
    let incomplete = tasks.iter().filter(|task| !task.completed).count();
    let mut suggestions = Vec::with_capacity(2);

    if incomplete > REVIEW_PENDING_THRESHOLD {
        suggestions.push(Suggestion::new(
            REVIEW_PENDING_TITLE,
            format!("You have {incomplete} incomplete tasks. Consider prioritizing or breaking them down."),
            days_after(today, 1),
        ));
    }

    if tasks.len() > WEEKLY_CHECK_THRESHOLD {
        suggestions.push(Suggestion::new(
            WEEKLY_CHECK_TITLE,
            "Review your progress this week and plan ahead.",
            days_after(today, 7),
        ));
    }

    suggestions
}

fn days_after(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
