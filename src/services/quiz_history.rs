use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use serde::Serialize;

use crate::irt::{AbilityEstimator, DifficultyLevel};
use crate::services::quiz::{HistoryEntry, QuizSession};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HistoryError {
    #[error("quiz {0} already exists")]
    Duplicate(String),
    #[error("quiz {0} not found")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectPerformance {
    pub quizzes: usize,
    /// Mean score per quiz, in marks.
    pub avg_score: f64,
    pub percentage: f64,
}

/// Aggregate standing across every stored quiz, ungraded ones included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub avg_percentage: f64,
    pub ability: f64,
    pub level: DifficultyLevel,
    pub subject_performance: BTreeMap<String, SubjectPerformance>,
}

/// In-memory store of every generated quiz, keyed by quiz id. Grows without
/// eviction for the lifetime of the process.
#[derive(Default)]
pub struct QuizHistory {
    sessions: RwLock<HashMap<String, QuizSession>>,
}

impl QuizHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh session. An existing entry under the same id is left untouched.
    pub fn insert(&self, session: QuizSession) -> Result<(), HistoryError> {
        let mut sessions = self.sessions.write();
        if sessions.contains_key(&session.quiz_id) {
            return Err(HistoryError::Duplicate(session.quiz_id));
        }
        sessions.insert(session.quiz_id.clone(), session);
        Ok(())
    }

    pub fn get(&self, quiz_id: &str) -> Option<QuizSession> {
        self.sessions.read().get(quiz_id).cloned()
    }

    /// Runs `f` on the stored session under the write lock. Anything `f` does to
    /// other state is ordered with every other update of this store.
    pub fn update<T, E>(
        &self,
        quiz_id: &str,
        f: impl FnOnce(&mut QuizSession) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<HistoryError>,
    {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(quiz_id)
            .ok_or_else(|| HistoryError::NotFound(quiz_id.to_string()))?;
        f(session)
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    pub fn entries(&self) -> HashMap<String, HistoryEntry> {
        self.sessions
            .read()
            .iter()
            .map(|(id, session)| (id.clone(), HistoryEntry::from(session)))
            .collect()
    }

    /// Percentages are 0 wherever the marks behind them sum to 0.
    pub fn performance_summary(&self, estimator: &AbilityEstimator) -> PerformanceSummary {
        let sessions = self.sessions.read();
        let ability = estimator.snapshot();

        let mut score = 0.0;
        let mut total = 0.0;
        let mut by_subject: BTreeMap<String, (usize, f64, f64)> = BTreeMap::new();
        for session in sessions.values() {
            score += session.score;
            total += session.total_marks;
            let entry = by_subject
                .entry(session.metadata.subject.clone())
                .or_insert((0, 0.0, 0.0));
            entry.0 += 1;
            entry.1 += session.score;
            entry.2 += session.total_marks;
        }

        PerformanceSummary {
            avg_percentage: percentage(score, total),
            ability: ability.ability,
            level: ability.level,
            subject_performance: by_subject
                .into_iter()
                .map(|(subject, (quizzes, score, total))| {
                    let performance = SubjectPerformance {
                        quizzes,
                        avg_score: score / quizzes as f64,
                        percentage: percentage(score, total),
                    };
                    (subject, performance)
                })
                .collect(),
        }
    }
}

fn percentage(score: f64, total: f64) -> f64 {
    if total > 0.0 {
        score / total * 100.0
    } else {
        0.0
    }
}
