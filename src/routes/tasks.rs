use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::response::AppError;
use crate::services::tasks::{TaskKind, TaskResult, TaskState};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    pub task_id: String,
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    message: String,
}

fn task_not_found() -> AppError {
    AppError::not_found("TASK_NOT_FOUND", "Task not found")
}

#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    task_id: String,
    kind: &'static str,
    status: &'static str,
    message: String,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

pub async fn status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<TaskDetailResponse>, AppError> {
    let record = state.tasks().get(&task_id).ok_or_else(task_not_found)?;
    let message = match &record.state {
        TaskState::Processing => "Processing in progress".to_string(),
        TaskState::Completed(_) => "Processing completed successfully".to_string(),
        TaskState::Failed(failure) => format!("Processing failed: {}", failure.message),
    };
    Ok(Json(TaskDetailResponse {
        task_id: record.id,
        kind: record.kind.as_str(),
        status: record.state.as_str(),
        message,
        created_at: record.created_at,
        finished_at: record.finished_at,
    }))
}

pub async fn cleanup(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    if !state.tasks().remove(&task_id) {
        return Err(task_not_found());
    }
    Ok(Json(MessageResponse {
        message: format!("Task {task_id} cleaned up successfully"),
    }))
}

/// 200 with the result once done, 202 while running, the recorded error if it failed.
pub(super) fn poll_result(
    state: &AppState,
    task_id: String,
    kind: TaskKind,
) -> Result<Response, AppError> {
    let record = state.tasks().get(&task_id).ok_or_else(task_not_found)?;
    if record.kind != kind {
        return Err(AppError::bad_request(format!(
            "task {task_id} is a {} task",
            record.kind.as_str()
        )));
    }

    match record.state {
        TaskState::Processing => Ok((
            StatusCode::ACCEPTED,
            Json(TaskStatusResponse {
                task_id,
                status: "processing",
                message: "Task is still processing".to_string(),
            }),
        )
            .into_response()),
        TaskState::Failed(failure) => Err(AppError::from_task_failure(
            &failure.code,
            failure.message,
        )),
        TaskState::Completed(TaskResult::Quiz(quiz)) => Ok(Json(*quiz).into_response()),
        TaskState::Completed(TaskResult::Evaluation(outcome)) => Ok(Json(outcome).into_response()),
    }
}
