//! REST handlers for `/tasks`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskError, TaskStatus};
use crate::http::request::RequestContext;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::logger::attr;

/// Body of `POST /tasks`. Missing fields default to empty strings.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PATCH /tasks/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskStatusRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /tasks[?status=...]`
pub async fn list_tasks(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let raw_status = query.status.filter(|s| !s.is_empty());
    state
        .logger
        .info(
            &ctx.cancel,
            "getting tasks",
            vec![ctx.id_attr(), attr("status_filter", raw_status.as_deref().unwrap_or(""))],
        )
        .await;

    let status = match raw_status.as_deref().map(str::parse::<TaskStatus>).transpose() {
        Ok(status) => status,
        Err(_) => {
            state
                .logger
                .warn(
                    &ctx.cancel,
                    "invalid status parameter",
                    vec![ctx.id_attr(), attr("status", raw_status.as_deref())],
                )
                .await;
            return Err(ApiError::InvalidStatus);
        }
    };

    match state.service.list_tasks(&ctx.cancel, status).await {
        Ok(tasks) => Ok(Json(tasks)),
        Err(e) => {
            state
                .logger
                .error(
                    &ctx.cancel,
                    "failed to get tasks",
                    vec![ctx.id_attr(), attr("error", e.to_string())],
                )
                .await;
            Err(e.into())
        }
    }
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    state
        .logger
        .info(&ctx.cancel, "getting task by ID", vec![ctx.id_attr(), attr("task_id", &id)])
        .await;

    match state.service.get_task(&ctx.cancel, &id).await {
        Ok(task) => Ok(Json(task)),
        Err(e) => Err(report_task_error(&state, &ctx, &id, e, "failed to get task").await),
    }
}

/// `POST /tasks`
pub async fn create_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    state
        .logger
        .info(&ctx.cancel, "creating new task", vec![ctx.id_attr()])
        .await;

    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state
                .logger
                .warn(
                    &ctx.cancel,
                    "invalid request format",
                    vec![ctx.id_attr(), attr("error", rejection.body_text())],
                )
                .await;
            return Err(ApiError::InvalidRequestFormat);
        }
    };

    state
        .logger
        .debug(
            &ctx.cancel,
            "parsed create task request",
            vec![ctx.id_attr(), attr("title", &req.title)],
        )
        .await;

    match state
        .service
        .create_task(&ctx.cancel, &req.title, &req.description)
        .await
    {
        Ok(task) => Ok((StatusCode::CREATED, Json(task))),
        Err(TaskError::EmptyTitle) => {
            state
                .logger
                .warn(&ctx.cancel, "task creation failed: empty title", vec![ctx.id_attr()])
                .await;
            Err(ApiError::TitleRequired)
        }
        Err(e) => {
            state
                .logger
                .error(
                    &ctx.cancel,
                    "failed to create task",
                    vec![ctx.id_attr(), attr("error", e.to_string())],
                )
                .await;
            Err(e.into())
        }
    }
}

/// `PATCH /tasks/{id}` with `{"status": "..."}`
pub async fn update_task_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<Json<UpdateTaskStatusRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    state
        .logger
        .info(&ctx.cancel, "updating task status", vec![ctx.id_attr(), attr("task_id", &id)])
        .await;

    let Json(req) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            state
                .logger
                .warn(
                    &ctx.cancel,
                    "invalid request format",
                    vec![ctx.id_attr(), attr("error", rejection.body_text())],
                )
                .await;
            return Err(ApiError::InvalidRequestFormat);
        }
    };

    let status: TaskStatus = match req.status.parse() {
        Ok(status) => status,
        Err(_) => {
            state
                .logger
                .warn(
                    &ctx.cancel,
                    "invalid status parameter",
                    vec![ctx.id_attr(), attr("status", &req.status)],
                )
                .await;
            return Err(ApiError::InvalidStatus);
        }
    };

    match state.service.update_task_status(&ctx.cancel, &id, status).await {
        Ok(task) => Ok(Json(task)),
        Err(e) => Err(report_task_error(&state, &ctx, &id, e, "failed to update task status").await),
    }
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .logger
        .info(&ctx.cancel, "deleting task", vec![ctx.id_attr(), attr("task_id", &id)])
        .await;

    match state.service.delete_task(&ctx.cancel, &id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(report_task_error(&state, &ctx, &id, e, "failed to delete task").await),
    }
}

/// Log a service failure for a single task and map it to a response.
/// Not-found is a WARN; everything else is an ERROR.
async fn report_task_error(
    state: &AppState,
    ctx: &RequestContext,
    id: &str,
    err: TaskError,
    message: &'static str,
) -> ApiError {
    if err == TaskError::NotFound {
        state
            .logger
            .warn(&ctx.cancel, "task not found", vec![ctx.id_attr(), attr("task_id", id)])
            .await;
    } else {
        state
            .logger
            .error(
                &ctx.cancel,
                message,
                vec![ctx.id_attr(), attr("task_id", id), attr("error", err.to_string())],
            )
            .await;
    }
    err.into()
}
