//! In-memory task repository. Contents are lost on restart.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{Task, TaskError, TaskStatus};
use crate::repository::TaskRepository;

/// Thread-safe map of task id to task.
#[derive(Debug, Default)]
pub struct MemoryTaskRepository {
    tasks: DashMap<String, Task>,
}

impl MemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskRepository for MemoryTaskRepository {
    fn create(&self, task: Task) -> Result<(), TaskError> {
        match self.tasks.entry(task.id.clone()) {
            Entry::Occupied(_) => Err(TaskError::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(task);
                Ok(())
            }
        }
    }

    fn get_by_id(&self, id: &str) -> Result<Task, TaskError> {
        self.tasks
            .get(id)
            .map(|r| r.value().clone())
            .ok_or(TaskError::NotFound)
    }

    /// Ordered by creation time, then id, so listings are stable.
    fn get_all(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, TaskError> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|r| status.map_or(true, |s| r.value().status == s))
            .map(|r| r.value().clone())
            .collect();

        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tasks)
    }

    fn update(&self, task: Task) -> Result<(), TaskError> {
        match self.tasks.get_mut(&task.id) {
            Some(mut stored) => {
                *stored = task;
                Ok(())
            }
            None => Err(TaskError::NotFound),
        }
    }

    fn delete(&self, id: &str) -> Result<(), TaskError> {
        self.tasks.remove(id).map(|_| ()).ok_or(TaskError::NotFound)
    }
}
