//! Task use cases.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::{Task, TaskError, TaskStatus};
use crate::logger::{attr, AsyncLogger};
use crate::repository::TaskRepository;

/// Number of random bytes in a task id (hex encoded, so ids are twice as long).
const ID_LENGTH: usize = 16;

/// Orchestrates the repository and logs every decision it makes.
#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
    logger: Arc<AsyncLogger>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>, logger: Arc<AsyncLogger>) -> Self {
        Self { repo, logger }
    }

    /// Create a pending task with a fresh random id.
    pub async fn create_task(
        &self,
        ctx: &CancellationToken,
        title: &str,
        description: &str,
    ) -> Result<Task, TaskError> {
        self.logger
            .debug(ctx, "creating task", vec![attr("title", title)])
            .await;

        if title.is_empty() {
            self.logger
                .warn(ctx, "task creation failed: empty title", vec![])
                .await;
            return Err(TaskError::EmptyTitle);
        }

        let id = generate_id();
        let task = Task::new(id.clone(), title, description);

        if let Err(e) = self.repo.create(task.clone()) {
            self.logger
                .error(
                    ctx,
                    "failed to create task in repository",
                    vec![attr("task_id", &id), attr("error", e.to_string())],
                )
                .await;
            return Err(e);
        }

        self.logger
            .info(
                ctx,
                "task created successfully",
                vec![attr("task_id", &id), attr("title", title)],
            )
            .await;
        Ok(task)
    }

    pub async fn get_task(&self, ctx: &CancellationToken, id: &str) -> Result<Task, TaskError> {
        self.logger
            .debug(ctx, "getting task by ID", vec![attr("task_id", id)])
            .await;

        match self.repo.get_by_id(id) {
            Ok(task) => {
                self.logger
                    .debug(ctx, "task retrieved successfully", vec![attr("task_id", id)])
                    .await;
                Ok(task)
            }
            Err(TaskError::NotFound) => {
                self.logger
                    .debug(ctx, "task not found", vec![attr("task_id", id)])
                    .await;
                Err(TaskError::NotFound)
            }
            Err(e) => {
                self.logger
                    .error(
                        ctx,
                        "failed to get task from repository",
                        vec![attr("task_id", id), attr("error", e.to_string())],
                    )
                    .await;
                Err(e)
            }
        }
    }

    /// All tasks, or only those in `status`.
    pub async fn list_tasks(
        &self,
        ctx: &CancellationToken,
        status: Option<TaskStatus>,
    ) -> Result<Vec<Task>, TaskError> {
        let filter = status.map_or("", |s| s.as_str());
        self.logger
            .debug(ctx, "getting all tasks", vec![attr("status_filter", filter)])
            .await;

        let tasks = match self.repo.get_all(status) {
            Ok(tasks) => tasks,
            Err(e) => {
                self.logger
                    .error(
                        ctx,
                        "failed to get tasks from repository",
                        vec![attr("error", e.to_string())],
                    )
                    .await;
                return Err(e);
            }
        };

        self.logger
            .debug(
                ctx,
                "tasks retrieved successfully",
                vec![attr("count", tasks.len()), attr("status_filter", filter)],
            )
            .await;
        Ok(tasks)
    }

    pub async fn update_task_status(
        &self,
        ctx: &CancellationToken,
        id: &str,
        status: TaskStatus,
    ) -> Result<Task, TaskError> {
        self.logger
            .debug(
                ctx,
                "updating task status",
                vec![attr("task_id", id), attr("new_status", status.as_str())],
            )
            .await;

        let mut task = match self.repo.get_by_id(id) {
            Ok(task) => task,
            Err(TaskError::NotFound) => {
                self.logger
                    .debug(ctx, "task not found for status update", vec![attr("task_id", id)])
                    .await;
                return Err(TaskError::NotFound);
            }
            Err(e) => {
                self.logger
                    .error(
                        ctx,
                        "failed to get task for status update",
                        vec![attr("task_id", id), attr("error", e.to_string())],
                    )
                    .await;
                return Err(e);
            }
        };

        let old_status = task.status;
        task.update_status(status);

        if let Err(e) = self.repo.update(task.clone()) {
            self.logger
                .error(
                    ctx,
                    "failed to update task in repository",
                    vec![attr("task_id", id), attr("error", e.to_string())],
                )
                .await;
            return Err(e);
        }

        self.logger
            .info(
                ctx,
                "task status updated successfully",
                vec![
                    attr("task_id", id),
                    attr("old_status", old_status.as_str()),
                    attr("new_status", status.as_str()),
                ],
            )
            .await;
        Ok(task)
    }

    pub async fn delete_task(&self, ctx: &CancellationToken, id: &str) -> Result<(), TaskError> {
        match self.repo.delete(id) {
            Ok(()) => {
                self.logger
                    .info(ctx, "task deleted", vec![attr("task_id", id)])
                    .await;
                Ok(())
            }
            Err(TaskError::NotFound) => {
                self.logger
                    .debug(ctx, "task not found for delete", vec![attr("task_id", id)])
                    .await;
                Err(TaskError::NotFound)
            }
            Err(e) => {
                self.logger
                    .error(
                        ctx,
                        "failed to delete task from repository",
                        vec![attr("task_id", id), attr("error", e.to_string())],
                    )
                    .await;
                Err(e)
            }
        }
    }
}

/// Random hex id.
fn generate_id() -> String {
    hex::encode(rand::random::<[u8; ID_LENGTH]>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{Level, MemorySink};
    use crate::repository::MemoryTaskRepository;
    use std::num::NonZeroUsize;

    fn service(level: Level) -> (TaskService, Arc<AsyncLogger>, MemorySink, CancellationToken) {
        let sink = MemorySink::new();
        let logger = Arc::new(AsyncLogger::new(
            Box::new(sink.clone()),
            level,
            NonZeroUsize::new(64).unwrap(),
        ));
        let ctx = CancellationToken::new();
        logger.start(&ctx);
        let service = TaskService::new(Arc::new(MemoryTaskRepository::new()), logger.clone());
        (service, logger, sink, ctx)
    }

    #[test]
    fn test_generate_id_is_hex() {
        let id = generate_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_id());
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let (service, logger, sink, ctx) = service(Level::Info);

        assert_eq!(
            service.create_task(&ctx, "", "d").await.unwrap_err(),
            TaskError::EmptyTitle
        );
        logger.close().await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"WARN\""));
    }

    #[tokio::test]
    async fn test_whitespace_title_is_kept() {
        let (service, logger, _sink, ctx) = service(Level::Info);

        let task = service.create_task(&ctx, "  ", "").await.unwrap();
        assert_eq!(task.title, "  ");
        logger.close().await;
    }

    #[tokio::test]
    async fn test_list_logs_empty_filter_as_empty_string() {
        let (service, logger, sink, ctx) = service(Level::Debug);

        service.list_tasks(&ctx, None).await.unwrap();
        service
            .list_tasks(&ctx, Some(TaskStatus::Completed))
            .await
            .unwrap();
        logger.close().await;

        let filters: Vec<serde_json::Value> = sink
            .lines()
            .iter()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["status_filter"].clone())
            .collect();
        assert_eq!(filters, vec!["", "", "completed", "completed"]);
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let (service, logger, sink, ctx) = service(Level::Info);

        let created = service.create_task(&ctx, "write tests", "all of them").await.unwrap();
        assert_eq!(created.status, TaskStatus::Pending);

        let fetched = service.get_task(&ctx, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        logger.close().await;

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        let line: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(line["message"], "task created successfully");
        assert_eq!(line["task_id"], created.id.as_str());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (service, logger, sink, ctx) = service(Level::Info);

        let task = service.create_task(&ctx, "t", "").await.unwrap();
        let updated = service
            .update_task_status(&ctx, &task.id, TaskStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert_eq!(
            service.get_task(&ctx, &task.id).await.unwrap().status,
            TaskStatus::InProgress
        );
        logger.close().await;

        let last: serde_json::Value = serde_json::from_str(sink.lines().last().unwrap()).unwrap();
        assert_eq!(last["old_status"], "pending");
        assert_eq!(last["new_status"], "in_progress");
    }

    #[tokio::test]
    async fn test_missing_task() {
        let (service, logger, _sink, ctx) = service(Level::Debug);

        assert_eq!(service.get_task(&ctx, "nope").await.unwrap_err(), TaskError::NotFound);
        assert_eq!(
            service
                .update_task_status(&ctx, "nope", TaskStatus::Completed)
                .await
                .unwrap_err(),
            TaskError::NotFound
        );
        assert_eq!(service.delete_task(&ctx, "nope").await.unwrap_err(), TaskError::NotFound);
        logger.close().await;
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let (service, logger, _sink, ctx) = service(Level::Info);

        let a = service.create_task(&ctx, "a", "").await.unwrap();
        service.create_task(&ctx, "b", "").await.unwrap();
        service
            .update_task_status(&ctx, &a.id, TaskStatus::Cancelled)
            .await
            .unwrap();

        assert_eq!(service.list_tasks(&ctx, None).await.unwrap().len(), 2);
        let cancelled = service
            .list_tasks(&ctx, Some(TaskStatus::Cancelled))
            .await
            .unwrap();
        assert_eq!(cancelled.len(), 1);
        assert_eq!(cancelled[0].id, a.id);
        logger.close().await;
    }

    #[tokio::test]
    async fn test_cancelled_context_does_not_affect_result() {
        let (service, logger, sink, _) = service(Level::Debug);
        let ctx = CancellationToken::new();
        ctx.cancel();

        let task = service.create_task(&ctx, "quiet", "").await.unwrap();
        assert_eq!(task.title, "quiet");
        logger.close().await;
        assert!(sink.contents().is_empty());
    }
}
