use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;

use crate::services::quiz::{EvaluationOutcome, QuizSession};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    QuizGeneration,
    QuizEvaluation,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuizGeneration => "quiz_generation",
            Self::QuizEvaluation => "quiz_evaluation",
        }
    }
}

#[derive(Debug, Clone)]
pub enum TaskResult {
    Quiz(Box<QuizSession>),
    Evaluation(EvaluationOutcome),
}

#[derive(Debug, Clone)]
pub struct TaskFailure {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub enum TaskState {
    Processing,
    Completed(TaskResult),
    Failed(TaskFailure),
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed(_) => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TaskRecord {
    pub id: String,
    pub kind: TaskKind,
    pub state: TaskState,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Tracks background generation and evaluation jobs so callers can poll them.
#[derive(Default)]
pub struct TaskRegistry {
    tasks: RwLock<HashMap<String, TaskRecord>>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, kind: TaskKind) -> String {
        let id = Uuid::new_v4().to_string();
        let record = TaskRecord {
            id: id.clone(),
            kind,
            state: TaskState::Processing,
            created_at: Utc::now(),
            finished_at: None,
        };
        self.tasks.write().insert(id.clone(), record);
        id
    }

    pub fn complete(&self, id: &str, result: TaskResult) {
        self.finish(id, TaskState::Completed(result));
    }

    pub fn fail(&self, id: &str, code: impl Into<String>, message: impl Into<String>) {
        self.finish(
            id,
            TaskState::Failed(TaskFailure {
                code: code.into(),
                message: message.into(),
            }),
        );
    }

    /// A task removed while running stays removed; its late result is dropped.
    fn finish(&self, id: &str, state: TaskState) {
        if let Some(record) = self.tasks.write().get_mut(id) {
            record.state = state;
            record.finished_at = Some(Utc::now());
        }
    }

    pub fn get(&self, id: &str) -> Option<TaskRecord> {
        self.tasks.read().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> bool {
        self.tasks.write().remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.read().is_empty()
    }

    /// Drops finished tasks older than `max_age`. Processing tasks are kept.
    pub fn sweep_finished(&self, max_age: Duration) -> usize {
        let now = Utc::now();
        let mut tasks = self.tasks.write();
        let before = tasks.len();
        tasks.retain(|_, record| match record.finished_at {
            Some(finished) => now
                .signed_duration_since(finished)
                .to_std()
                .map(|age| age < max_age)
                .unwrap_or(true),
            None => true,
        });
        before - tasks.len()
    }
}
