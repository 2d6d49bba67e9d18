//! Task persistence.
//!
//! # Design Decisions
//! - Storage sits behind the `TaskRepository` trait so the service never
//!   depends on a concrete backend
//! - Methods are synchronous; the in-memory store never waits on I/O
//! - Stored records are handed out as clones

pub mod memory;

pub use memory::MemoryTaskRepository;

use crate::domain::{Task, TaskError, TaskStatus};

/// Storage contract for tasks.
pub trait TaskRepository: Send + Sync {
    /// Store a new task. Fails with [`TaskError::AlreadyExists`] on id collision.
    fn create(&self, task: Task) -> Result<(), TaskError>;

    fn get_by_id(&self, id: &str) -> Result<Task, TaskError>;

    /// All tasks, optionally only those in `status`.
    fn get_all(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, TaskError>;

    /// Replace a stored task. Fails with [`TaskError::NotFound`] if absent.
    fn update(&self, task: Task) -> Result<(), TaskError>;

    fn delete(&self, id: &str) -> Result<(), TaskError>;
}
