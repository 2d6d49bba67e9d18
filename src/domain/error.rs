//! Domain error definitions.

use thiserror::Error;

/// Business rule violations and expected failure conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// No task exists with the requested id.
    #[error("task not found")]
    NotFound,

    /// Title was empty or whitespace.
    #[error("title in task cannot be empty")]
    EmptyTitle,

    /// A task with the same id is already stored.
    #[error("task already exists")]
    AlreadyExists,

    /// Status string is not one of the known task states.
    #[error("invalid task status: {0:?}")]
    InvalidStatus(String),
}
