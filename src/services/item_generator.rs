use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::irt::DifficultyLevel;
use crate::services::llm_provider::{LLMError, LLMProvider};
use crate::services::quiz::RawItem;
use crate::services::syllabus::StaticSyllabus;

#[derive(Debug, Clone)]
pub struct ItemRequest {
    pub level: DifficultyLevel,
    pub subject: String,
    pub topic: Option<String>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("item generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("model call failed: {0}")]
    Llm(#[from] LLMError),
    #[error("model output unusable: {0}")]
    InvalidOutput(String),
    #[error("unknown subject: {0}")]
    UnknownSubject(String),
}

/// Produces raw candidate questions for a level/subject/topic. Implementations
/// may block on network I/O; callers impose their own deadline.
#[async_trait]
pub trait ItemGenerator: Send + Sync {
    async fn generate(&self, request: &ItemRequest) -> Result<Vec<RawItem>, GenerationError>;
}

pub struct LlmItemGenerator {
    llm: LLMProvider,
    syllabus: Arc<StaticSyllabus>,
}

impl LlmItemGenerator {
    pub fn new(llm: LLMProvider, syllabus: Arc<StaticSyllabus>) -> Self {
        Self { llm, syllabus }
    }
}

#[async_trait]
impl ItemGenerator for LlmItemGenerator {
    async fn generate(&self, request: &ItemRequest) -> Result<Vec<RawItem>, GenerationError> {
        if !self.syllabus.has_subject(&request.subject) {
            return Err(GenerationError::UnknownSubject(request.subject.clone()));
        }

        let prompt =
            self.syllabus
                .build_prompt(request.level, &request.subject, request.topic.as_deref());
        let reply = self
            .llm
            .complete_json(&self.syllabus.system_prompt(), &prompt)
            .await?;
        debug!(model = self.llm.model(), bytes = reply.len(), "received generated items");

        parse_generated_items(&reply)
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedQuiz {
    #[serde(default)]
    questions: Vec<GeneratedQuestion>,
}

/// Model output with the loosely typed fields kept as raw JSON.
#[derive(Debug, Deserialize)]
struct GeneratedQuestion {
    text: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    options: Option<Vec<Value>>,
    answer: Value,
    difficulty: String,
    marks: Value,
    #[serde(default)]
    solution: Option<Value>,
}

impl GeneratedQuestion {
    fn into_raw_item(self, index: usize) -> Result<RawItem, GenerationError> {
        let answer = scalar_to_string(&self.answer).ok_or_else(|| {
            GenerationError::InvalidOutput(format!("question {index}: answer is not a scalar"))
        })?;
        let marks = match &self.marks {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
        .ok_or_else(|| {
            GenerationError::InvalidOutput(format!("question {index}: marks is not numeric"))
        })?;
        let options = self
            .options
            .unwrap_or_default()
            .iter()
            .filter_map(scalar_to_string)
            .collect();
        let solution = match self.solution {
            Some(Value::Array(steps)) => steps
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join("\n"),
            Some(other) => scalar_to_string(&other).unwrap_or_default(),
            None => String::new(),
        };

        Ok(RawItem {
            text: self.text,
            item_type: self.item_type,
            options,
            answer,
            difficulty: self.difficulty,
            marks,
            solution,
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn parse_generated_items(reply: &str) -> Result<Vec<RawItem>, GenerationError> {
    let json = extract_json_object(reply);
    let quiz: GeneratedQuiz = serde_json::from_str(json)
        .map_err(|e| GenerationError::InvalidOutput(format!("not a quiz object: {e}")))?;
    if quiz.questions.is_empty() {
        return Err(GenerationError::InvalidOutput("no questions".to_string()));
    }
    quiz.questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| q.into_raw_item(i))
        .collect()
}

fn extract_json_object(reply: &str) -> &str {
    let trimmed = reply.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}
