use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use super::tasks::{poll_result, TaskStatusResponse};
use crate::response::{quiz_error_code, AppError};
use crate::services::tasks::{TaskKind, TaskResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateQuizRequest {
    subject: String,
    topic: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuizRequest {
    quiz_id: String,
    responses: HashMap<String, String>,
}

pub async fn generate_quiz(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<Json<TaskStatusResponse>, AppError> {
    let subject = payload.subject.trim().to_string();
    if subject.is_empty() {
        return Err(AppError::bad_request("subject is required"));
    }
    let topic = payload
        .topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let tasks = state.tasks();
    let lifecycle = state.lifecycle();
    let task_id = tasks.create(TaskKind::QuizGeneration);
    info!(%task_id, %subject, ?topic, "quiz generation accepted");

    let id = task_id.clone();
    tokio::spawn(async move {
        match lifecycle.generate_quiz(&subject, topic.as_deref()).await {
            Ok(quiz) => tasks.complete(&id, TaskResult::Quiz(Box::new(quiz))),
            Err(err) => tasks.fail(&id, quiz_error_code(&err), err.to_string()),
        }
    });

    Ok(Json(TaskStatusResponse {
        task_id,
        status: "processing",
        message: "Quiz generation in progress".to_string(),
    }))
}

pub async fn quiz_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, AppError> {
    poll_result(&state, task_id, TaskKind::QuizGeneration)
}

pub async fn submit_quiz(
    State(state): State<AppState>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<Json<TaskStatusResponse>, AppError> {
    if payload.quiz_id.trim().is_empty() {
        return Err(AppError::bad_request("quiz_id is required"));
    }

    let tasks = state.tasks();
    let lifecycle = state.lifecycle();
    let task_id = tasks.create(TaskKind::QuizEvaluation);
    info!(%task_id, quiz_id = %payload.quiz_id, "quiz submission accepted");

    let id = task_id.clone();
    // Re-estimation is O(history) per item; runs on the blocking pool.
    tokio::task::spawn_blocking(move || {
        match lifecycle.evaluate_quiz(&payload.quiz_id, &payload.responses) {
            Ok(outcome) => tasks.complete(&id, TaskResult::Evaluation(outcome)),
            Err(err) => tasks.fail(&id, quiz_error_code(&err), err.to_string()),
        }
    });

    Ok(Json(TaskStatusResponse {
        task_id,
        status: "processing",
        message: "Quiz evaluation in progress".to_string(),
    }))
}

pub async fn evaluation_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Response, AppError> {
    poll_result(&state, task_id, TaskKind::QuizEvaluation)
}
