//! Core business entities.
//!
//! # Design Decisions
//! - Status is a closed enum; strings are parsed at the edges
//! - Timestamps are UTC and serialize as RFC3339

pub mod error;
pub mod task;

pub use error::TaskError;
pub use task::{Task, TaskStatus};
