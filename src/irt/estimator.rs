use parking_lot::RwLock;
use tracing::debug;

use crate::irt::config::IrtConfig;
use crate::irt::types::{AbilitySnapshot, DifficultyLevel, IrtError, ResponseRecord};

#[derive(Debug, Default)]
struct AbilityState {
    theta: f64,
    history: Vec<ResponseRecord>,
}

/// Maximum-likelihood ability estimate under the two-parameter logistic model.
///
/// Every update re-solves the likelihood over the whole response history,
/// starting from the previous estimate. Appending a record and recomputing
/// theta happen under one write lock, so readers only ever see committed
/// estimates.
pub struct AbilityEstimator {
    config: IrtConfig,
    state: RwLock<AbilityState>,
}

impl Default for AbilityEstimator {
    fn default() -> Self {
        Self::new(IrtConfig::default())
    }
}

impl AbilityEstimator {
    pub fn new(config: IrtConfig) -> Self {
        Self {
            config,
            state: RwLock::new(AbilityState::default()),
        }
    }

    pub fn config(&self) -> &IrtConfig {
        &self.config
    }

    pub fn update_ability(
        &self,
        question_id: &str,
        correct: bool,
        a: f64,
        b: f64,
    ) -> Result<f64, IrtError> {
        self.record_responses(vec![ResponseRecord::new(question_id, correct, a, b)])
    }

    /// Applies the records in order, re-estimating after each one, as a single
    /// critical section. Nothing is appended unless every record is valid.
    pub fn record_responses(&self, records: Vec<ResponseRecord>) -> Result<f64, IrtError> {
        for record in &records {
            validate_params(record.a, record.b)?;
        }

        let mut state = self.state.write();
        for record in records {
            state.history.push(record);
            let theta = estimate_theta(state.theta, &state.history, &self.config);
            debug!(
                previous = state.theta,
                theta,
                responses = state.history.len(),
                "ability re-estimated"
            );
            state.theta = theta;
        }
        Ok(state.theta)
    }

    pub fn get_ability(&self) -> f64 {
        self.state.read().theta
    }

    pub fn get_level(&self) -> DifficultyLevel {
        DifficultyLevel::from_theta(self.get_ability(), &self.config.levels)
    }

    /// Theta, level and history length read under one lock.
    pub fn snapshot(&self) -> AbilitySnapshot {
        let state = self.state.read();
        AbilitySnapshot {
            ability: state.theta,
            level: DifficultyLevel::from_theta(state.theta, &self.config.levels),
            responses: state.history.len(),
        }
    }

    pub fn history(&self) -> Vec<ResponseRecord> {
        self.state.read().history.clone()
    }

    pub fn history_len(&self) -> usize {
        self.state.read().history.len()
    }
}

fn validate_params(a: f64, b: f64) -> Result<(), IrtError> {
    if !a.is_finite() || a <= 0.0 {
        return Err(IrtError::InvalidDiscrimination(a));
    }
    if !b.is_finite() {
        return Err(IrtError::InvalidDifficulty(b));
    }
    Ok(())
}

pub fn probability_correct(theta: f64, a: f64, b: f64, logit_clip: f64) -> f64 {
    let logit = (a * (theta - b)).clamp(-logit_clip, logit_clip);
    1.0 / (1.0 + (-logit).exp())
}

/// Newton-Raphson iterations on the 2PL log-likelihood, from `start`.
pub fn estimate_theta(start: f64, history: &[ResponseRecord], config: &IrtConfig) -> f64 {
    let mut theta = start;
    for _ in 0..config.max_iterations {
        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for record in history {
            let p = probability_correct(theta, record.a, record.b, config.logit_clip);
            numerator += record.a * (record.response_value() - p);
            denominator += record.a * record.a * p * (1.0 - p);
        }
        // Zero information left at this theta. A non-finite sum only arises from
        // discriminations so large that a^2 overflows.
        if denominator == 0.0 || !denominator.is_finite() {
            break;
        }
        let step = numerator / denominator;
        if !step.is_finite() {
            break;
        }
        theta = (theta + step).clamp(config.theta_min, config.theta_max);
    }
    theta
}
