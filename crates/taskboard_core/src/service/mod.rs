//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, rules and repository writes into board actions.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_board;
