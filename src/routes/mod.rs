mod health;
mod quiz;
mod student;
mod subjects;
mod tasks;

use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::response::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health).fallback(fallback_handler))
        .route("/subjects", get(subjects::list_subjects).fallback(fallback_handler))
        .route(
            "/generate-quiz",
            post(quiz::generate_quiz).fallback(fallback_handler),
        )
        .route(
            "/quiz-result/:task_id",
            get(quiz::quiz_result).fallback(fallback_handler),
        )
        .route(
            "/submit-quiz",
            post(quiz::submit_quiz).fallback(fallback_handler),
        )
        .route(
            "/evaluation-result/:task_id",
            get(quiz::evaluation_result).fallback(fallback_handler),
        )
        .route(
            "/student-ability",
            get(student::ability).fallback(fallback_handler),
        )
        .route(
            "/student-history",
            get(student::history).fallback(fallback_handler),
        )
        .route(
            "/student-performance",
            get(student::performance).fallback(fallback_handler),
        )
        .route(
            "/status/:task_id",
            get(tasks::status).fallback(fallback_handler),
        )
        .route(
            "/cleanup-task/:task_id",
            delete(tasks::cleanup).fallback(fallback_handler),
        )
        .with_state(state)
}

async fn fallback_handler() -> Response {
    AppError::method_not_allowed().into_response()
}
