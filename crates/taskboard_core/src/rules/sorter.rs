//! Priority ordering for task collections.

use crate::model::task::Task;

/// Sorts tasks by priority rank in place.
///
/// Stable: tasks sharing a tier keep their relative input order.
pub fn sort_by_priority(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.priority.rank());
}

/// Returns a priority-ordered copy of `tasks`.
pub fn sorted_by_priority(tasks: &[Task]) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sort_by_priority(&mut sorted);
    sorted
}
