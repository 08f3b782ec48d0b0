use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::services::quiz_lifecycle::QuizError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct AppError {
    status: StatusCode,
    code: String,
    message: String,
    is_operational: bool,
}

impl AppError {
    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::operational(StatusCode::NOT_FOUND, code, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn method_not_allowed() -> Self {
        Self::operational(
            StatusCode::METHOD_NOT_ALLOWED,
            "METHOD_NOT_ALLOWED",
            "method not allowed",
        )
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
            is_operational: false,
        }
    }

    /// Rebuilds the error a background task recorded under `code`.
    pub fn from_task_failure(code: &str, message: impl Into<String>) -> Self {
        match code {
            QUIZ_NOT_FOUND => Self::not_found(code, message),
            MALFORMED_QUIZ => Self::operational(StatusCode::UNPROCESSABLE_ENTITY, code, message),
            GENERATION_FAILED => Self::operational(StatusCode::BAD_GATEWAY, code, message),
            _ => Self::internal(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    fn operational(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
            is_operational: true,
        }
    }
}

pub const QUIZ_NOT_FOUND: &str = "QUIZ_NOT_FOUND";
pub const MALFORMED_QUIZ: &str = "MALFORMED_QUIZ";
pub const GENERATION_FAILED: &str = "GENERATION_FAILED";
pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";

pub fn quiz_error_code(err: &QuizError) -> &'static str {
    match err {
        QuizError::GenerationFailed(_) => GENERATION_FAILED,
        QuizError::NotFound(_) => QUIZ_NOT_FOUND,
        QuizError::MalformedQuiz(_) | QuizError::Irt(_) => MALFORMED_QUIZ,
        QuizError::InvariantViolation(_) => INVARIANT_VIOLATION,
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        if let QuizError::InvariantViolation(_) = err {
            error!(error = %err, "quiz invariant violated");
        }
        Self::from_task_failure(quiz_error_code(&err), err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_operational {
            self.message
        } else {
            "internal server error".to_string()
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code: self.code,
        };

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::item_generator::GenerationError;

    #[test]
    fn test_quiz_error_mapping() {
        let not_found = AppError::from(QuizError::NotFound("q".to_string()));
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.code(), QUIZ_NOT_FOUND);

        let malformed = AppError::from(QuizError::MalformedQuiz("zero marks".to_string()));
        assert_eq!(malformed.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let failed = AppError::from(QuizError::GenerationFailed(GenerationError::InvalidOutput(
            "x".to_string(),
        )));
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);

        let fatal = AppError::from(QuizError::InvariantViolation("dup".to_string()));
        assert_eq!(fatal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
