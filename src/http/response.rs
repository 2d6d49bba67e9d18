//! Error responses.
//!
//! Every failure is rendered as `{"error": "<message>"}` with a fixed set of
//! client-facing messages; internal details stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TaskError;

/// JSON body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Client-visible API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("invalid status parameter")]
    InvalidStatus,

    #[error("task not found")]
    TaskNotFound,

    #[error("invalid request format")]
    InvalidRequestFormat,

    #[error("title is required")]
    TitleRequired,

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidStatus | ApiError::InvalidRequestFormat | ApiError::TitleRequired => {
                StatusCode::BAD_REQUEST
            }
            ApiError::TaskNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound => ApiError::TaskNotFound,
            TaskError::EmptyTitle => ApiError::TitleRequired,
            TaskError::InvalidStatus(_) => ApiError::InvalidStatus,
            TaskError::AlreadyExists => ApiError::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
