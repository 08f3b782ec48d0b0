use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::irt::{AbilityEstimator, DifficultyLevel, DiscriminationSampler, IrtError};
use crate::services::item_generator::{GenerationError, ItemGenerator, ItemRequest};
use crate::services::quiz::{
    EvaluationOutcome, HistoryEntry, Question, QuestionType, QuizMetadata, QuizSession, RawItem,
};
use crate::services::quiz_history::{HistoryError, PerformanceSummary, QuizHistory};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("quiz generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),
    #[error("quiz {0} not found")]
    NotFound(String),
    #[error("malformed quiz: {0}")]
    MalformedQuiz(String),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Irt(#[from] IrtError),
}

impl From<HistoryError> for QuizError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Duplicate(id) => {
                QuizError::InvariantViolation(format!("quiz id collision on {id}"))
            }
            HistoryError::NotFound(id) => QuizError::NotFound(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    pub generation_timeout: Duration,
    pub board: String,
    pub class_name: String,
}

/// Ties quiz generation and grading to the shared ability estimate.
pub struct QuizLifecycle {
    estimator: Arc<AbilityEstimator>,
    history: Arc<QuizHistory>,
    generator: Arc<dyn ItemGenerator>,
    sampler: DiscriminationSampler,
    settings: LifecycleSettings,
}

impl QuizLifecycle {
    pub fn new(
        estimator: Arc<AbilityEstimator>,
        history: Arc<QuizHistory>,
        generator: Arc<dyn ItemGenerator>,
        sampler: DiscriminationSampler,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            estimator,
            history,
            generator,
            sampler,
            settings,
        }
    }

    pub fn estimator(&self) -> &Arc<AbilityEstimator> {
        &self.estimator
    }

    pub fn history(&self) -> &Arc<QuizHistory> {
        &self.history
    }

    pub async fn generate_quiz(
        &self,
        subject: &str,
        topic: Option<&str>,
    ) -> Result<QuizSession, QuizError> {
        let ability = self.estimator.snapshot();
        let request = ItemRequest {
            level: ability.level,
            subject: subject.to_string(),
            topic: topic.map(str::to_string),
        };

        let timeout = self.settings.generation_timeout;
        let raw_items = match tokio::time::timeout(timeout, self.generator.generate(&request)).await {
            Ok(Ok(items)) => items,
            Ok(Err(err)) => {
                warn!(subject, topic, error = %err, "item generator failed");
                return Err(err.into());
            }
            Err(_) => {
                warn!(subject, topic, ?timeout, "item generator timed out");
                return Err(GenerationError::Timeout(timeout).into());
            }
        };

        let generated_at = Utc::now();
        let quiz_id = make_quiz_id(subject, topic, generated_at);
        let questions = raw_items
            .into_iter()
            .enumerate()
            .map(|(ordinal, raw)| self.build_question(&quiz_id, ordinal, raw))
            .collect::<Result<Vec<_>, _>>()?;
        if questions.is_empty() {
            return Err(QuizError::MalformedQuiz("no questions generated".to_string()));
        }

        let metadata = QuizMetadata {
            generated_at,
            board: self.settings.board.clone(),
            class_name: self.settings.class_name.clone(),
            subject: subject.to_string(),
            topic: topic.map(str::to_string),
            student_level: ability.level,
            student_ability: ability.ability,
        };
        let session = self.store(QuizSession::new(quiz_id, metadata, questions))?;

        info!(
            quiz_id = %session.quiz_id,
            level = %ability.level,
            questions = session.questions.len(),
            total_marks = session.total_marks,
            "quiz generated"
        );
        Ok(session)
    }

    fn store(&self, session: QuizSession) -> Result<QuizSession, QuizError> {
        self.history.insert(session.clone())?;
        Ok(session)
    }

    fn build_question(
        &self,
        quiz_id: &str,
        ordinal: usize,
        raw: RawItem,
    ) -> Result<Question, QuizError> {
        if raw.text.trim().is_empty() {
            return Err(QuizError::MalformedQuiz(format!("question {ordinal} has no text")));
        }
        if !raw.marks.is_finite() || raw.marks <= 0.0 {
            return Err(QuizError::MalformedQuiz(format!(
                "question {ordinal} has invalid marks {}",
                raw.marks
            )));
        }

        let question_type = QuestionType::parse(&raw.item_type).unwrap_or_else(|| {
            warn!(quiz_id, ordinal, label = %raw.item_type, "unrecognized question type, treating as short");
            QuestionType::Short
        });
        let options = match question_type {
            QuestionType::Mcq if raw.options.is_empty() => {
                return Err(QuizError::MalformedQuiz(format!(
                    "multiple-choice question {ordinal} has no options"
                )));
            }
            QuestionType::Mcq => raw.options,
            _ => Vec::new(),
        };

        let difficulty = DifficultyLevel::parse(&raw.difficulty).unwrap_or_else(|| {
            warn!(quiz_id, ordinal, label = %raw.difficulty, "unrecognized difficulty, using fallback tier");
            DifficultyLevel::FALLBACK
        });
        let config = self.estimator.config();

        Ok(Question {
            question_id: format!("{quiz_id}_q{ordinal}"),
            text: raw.text,
            question_type,
            options,
            correct_answer: raw.answer,
            difficulty,
            marks: raw.marks,
            solution_steps: raw.solution,
            irt_a: self.sampler.sample(),
            irt_b: difficulty.irt_b(&config.difficulty),
        })
    }

    /// Grades a submission and feeds every item, right or wrong, into the ability
    /// estimate. Resubmitting appends a fresh set of responses each time.
    pub fn evaluate_quiz(
        &self,
        quiz_id: &str,
        responses: &HashMap<String, String>,
    ) -> Result<EvaluationOutcome, QuizError> {
        // Ability update and score write share the history lock, so the stored
        // score always belongs to the last batch appended to the ability history.
        let outcome = self.history.update(quiz_id, |session| -> Result<_, QuizError> {
            let grading = session.grade(responses);
            if !grading.total_marks.is_finite() || grading.total_marks <= 0.0 {
                return Err(QuizError::MalformedQuiz(format!(
                    "quiz {quiz_id} has total marks {}",
                    grading.total_marks
                )));
            }

            let theta = self.estimator.record_responses(grading.records)?;
            session.apply_grading(grading.score, grading.total_marks, Utc::now());

            Ok(EvaluationOutcome {
                quiz_id: quiz_id.to_string(),
                score: grading.score,
                total_marks: grading.total_marks,
                percentage: grading.score / grading.total_marks * 100.0,
                updated_ability: theta,
                updated_level: DifficultyLevel::from_theta(theta, &self.estimator.config().levels),
            })
        })?;

        info!(
            quiz_id,
            score = outcome.score,
            total_marks = outcome.total_marks,
            theta = outcome.updated_ability,
            level = %outcome.updated_level,
            "quiz evaluated"
        );
        Ok(outcome)
    }

    pub fn performance_summary(&self) -> PerformanceSummary {
        self.history.performance_summary(&self.estimator)
    }

    pub fn history_entries(&self) -> HashMap<String, HistoryEntry> {
        self.history.entries()
    }
}

fn make_quiz_id(subject: &str, topic: Option<&str>, at: DateTime<Utc>) -> String {
    let slug = |s: &str| s.split_whitespace().collect::<Vec<_>>().join("-");
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}_{}",
        slug(subject),
        topic.map(slug).unwrap_or_else(|| "general".to_string()),
        at.format("%Y%m%d_%H%M%S"),
        &suffix[..8]
    )
}
