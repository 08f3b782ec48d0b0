use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelThresholds {
    /// Theta at or below this is `basic`.
    pub basic_max: f64,
    /// Theta at or above this is `advanced`.
    pub advanced_min: f64,
}

impl Default for LevelThresholds {
    fn default() -> Self {
        Self {
            basic_max: 0.0,
            advanced_min: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyTable {
    pub basic: f64,
    pub intermediate: f64,
    pub advanced: f64,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            basic: -1.0,
            intermediate: 0.0,
            advanced: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscriminationParams {
    pub base: f64,
    /// Width of the uniform jitter added on top of `base`, sampled from `[0, jitter)`.
    pub jitter: f64,
}

impl Default for DiscriminationParams {
    fn default() -> Self {
        Self {
            base: 1.0,
            jitter: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrtConfig {
    pub max_iterations: usize,
    pub theta_min: f64,
    pub theta_max: f64,
    pub logit_clip: f64,
    pub levels: LevelThresholds,
    pub difficulty: DifficultyTable,
    pub discrimination: DiscriminationParams,
}

impl Default for IrtConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            theta_min: -10.0,
            theta_max: 10.0,
            logit_clip: 500.0,
            levels: LevelThresholds::default(),
            difficulty: DifficultyTable::default(),
            discrimination: DiscriminationParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let config = IrtConfig::default();
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.theta_min, -10.0);
        assert_eq!(config.theta_max, 10.0);
        assert_eq!(config.logit_clip, 500.0);
        assert_eq!(config.difficulty.basic, -1.0);
        assert_eq!(config.difficulty.advanced, 1.0);
        assert_eq!(config.discrimination.base, 1.0);
        assert_eq!(config.discrimination.jitter, 0.5);
    }
}
