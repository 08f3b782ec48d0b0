pub mod config;
pub mod estimator;
pub mod sampler;
pub mod types;

pub use config::IrtConfig;
pub use estimator::AbilityEstimator;
pub use sampler::DiscriminationSampler;
pub use types::*;
