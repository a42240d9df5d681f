use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::Submission;
use crate::state::AppState;

use super::request::ExecuteRequest;
use super::response::{ExecuteResponse, TaskErrorResponse, TaskResultResponse};

/// `POST /execute`: validate, enqueue, and return the assigned task id.
pub async fn execute(State(state): State<AppState>, Json(req): Json<ExecuteRequest>) -> Response {
    let submission = match Submission::try_from(req) {
        Ok(submission) => submission,
        Err(err) => return validation_response(err),
    };

    match state.scheduler().submit(submission) {
        Ok(task_id) => (StatusCode::OK, Json(ExecuteResponse::accepted(task_id))).into_response(),
        Err(AppError::QueueFull) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(TaskErrorResponse::new("Task queue is full")),
        )
            .into_response(),
        Err(err @ AppError::Validation(_)) => validation_response(err),
        Err(err) => err.into_response(),
    }
}

fn validation_response(err: AppError) -> Response {
    let message = match err {
        AppError::Validation(msg) => msg,
        other => other.to_string(),
    };
    (StatusCode::BAD_REQUEST, Json(TaskErrorResponse::new(message))).into_response()
}

/// `GET /results/{task_id}`: consume-once poll of a task's current snapshot.
pub async fn get_result(State(state): State<AppState>, Path(task_id): Path<Uuid>) -> Response {
    match state.scheduler().poll(task_id).await {
        Some(task) => (StatusCode::OK, Json(TaskResultResponse::from(task))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(TaskErrorResponse::new("Task not found")),
        )
            .into_response(),
    }
}

/// `GET /status`: fleet-wide snapshot of queue, cache, workers, and host memory.
pub async fn get_status(State(state): State<AppState>) -> Response {
    Json(state.scheduler().status().await).into_response()
}
