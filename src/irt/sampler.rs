use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::irt::config::DiscriminationParams;

/// Source of per-item discrimination values. Seedable so quiz generation can
/// be reproduced in tests.
pub struct DiscriminationSampler {
    params: DiscriminationParams,
    rng: Mutex<StdRng>,
}

impl DiscriminationSampler {
    pub fn from_os_rng(params: DiscriminationParams) -> Self {
        Self {
            params,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    pub fn seeded(params: DiscriminationParams, seed: u64) -> Self {
        Self {
            params,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_seed_option(params: DiscriminationParams, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(params, seed),
            None => Self::from_os_rng(params),
        }
    }

    /// `base + U[0, jitter)`.
    pub fn sample(&self) -> f64 {
        if self.params.jitter <= 0.0 {
            return self.params.base;
        }
        let jitter = self.rng.lock().random_range(0.0..self.params.jitter);
        self.params.base + jitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_within_range() {
        let sampler = DiscriminationSampler::from_os_rng(DiscriminationParams::default());
        for _ in 0..1000 {
            let a = sampler.sample();
            assert!((1.0..1.5).contains(&a), "a = {a}");
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let first = DiscriminationSampler::seeded(DiscriminationParams::default(), 42);
        let second = DiscriminationSampler::seeded(DiscriminationParams::default(), 42);
        let xs: Vec<f64> = (0..10).map(|_| first.sample()).collect();
        let ys: Vec<f64> = (0..10).map(|_| second.sample()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_zero_jitter_is_constant() {
        let sampler = DiscriminationSampler::seeded(
            DiscriminationParams {
                base: 1.25,
                jitter: 0.0,
            },
            7,
        );
        assert_eq!(sampler.sample(), 1.25);
    }
}
