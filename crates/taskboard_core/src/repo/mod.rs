//! Storage collaborators for the task board.
//!
//! # Responsibility
//! - Define the repository contract the board writes through.
//! - Provide SQLite and JSON snapshot implementations.
//! - Push full-collection change notifications to one subscriber.
//!
//! # Invariants
//! - Repository writes enforce `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`) in
//!   addition to transport errors.

pub mod feed;
pub mod snapshot_repo;
pub mod task_repo;
