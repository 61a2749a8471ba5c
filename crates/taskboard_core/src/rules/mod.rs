//! Decision rules: priority classification, ordering and suggestions.
//!
//! # Responsibility
//! - Hold every piece of board logic that makes a decision.
//! - Stay free of storage and UI concerns.
//!
//! # Invariants
//! - All functions are total over validated input and never fail.

pub mod classifier;
pub mod sorter;
pub mod suggestions;
