//! Domain model for board tasks and suggestions.
//!
//! # Responsibility
//! - Define canonical data structures used by rules, storage and views.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Tasks are never hard-deleted; completion is the terminal state.

pub mod suggestion;
pub mod task;
