use serde::{Deserialize, Serialize};

use crate::irt::config::{DifficultyTable, LevelThresholds};

/// Difficulty tier of an item, and equally the coarse level a student sits at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// Tier used for labels the item generator produces that we do not recognise.
    pub const FALLBACK: Self = Self::Intermediate;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    /// Closed-open brackets: `(-inf, basic_max]`, `(basic_max, advanced_min)`, `[advanced_min, +inf)`.
    pub fn from_theta(theta: f64, thresholds: &LevelThresholds) -> Self {
        if theta <= thresholds.basic_max {
            Self::Basic
        } else if theta < thresholds.advanced_min {
            Self::Intermediate
        } else {
            Self::Advanced
        }
    }

    pub fn irt_b(&self, table: &DifficultyTable) -> f64 {
        match self {
            Self::Basic => table.basic,
            Self::Intermediate => table.intermediate,
            Self::Advanced => table.advanced,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub question_id: String,
    pub correct: bool,
    pub a: f64,
    pub b: f64,
}

impl ResponseRecord {
    pub fn new(question_id: impl Into<String>, correct: bool, a: f64, b: f64) -> Self {
        Self {
            question_id: question_id.into(),
            correct,
            a,
            b,
        }
    }

    pub fn response_value(&self) -> f64 {
        if self.correct {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AbilitySnapshot {
    pub ability: f64,
    pub level: DifficultyLevel,
    pub responses: usize,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IrtError {
    #[error("discrimination must be a finite positive number, got {0}")]
    InvalidDiscrimination(f64),
    #[error("difficulty must be finite, got {0}")]
    InvalidDifficulty(f64),
}
