//! View-facing configuration and projection.
//!
//! # Responsibility
//! - Resolve display configuration through the config collaborator.
//! - Project board state into a declarative view model.

pub mod config;
pub mod projection;
