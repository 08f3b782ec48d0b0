use std::sync::Arc;
use std::time::Instant;

use crate::config::QuizConfig;
use crate::irt::{AbilityEstimator, DiscriminationSampler, IrtConfig};
use crate::services::item_generator::ItemGenerator;
use crate::services::quiz_history::QuizHistory;
use crate::services::quiz_lifecycle::{LifecycleSettings, QuizLifecycle};
use crate::services::syllabus::StaticSyllabus;
use crate::services::tasks::TaskRegistry;

/// Process-wide services shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    lifecycle: Arc<QuizLifecycle>,
    tasks: Arc<TaskRegistry>,
    syllabus: Arc<StaticSyllabus>,
}

impl AppState {
    pub fn new(
        lifecycle: Arc<QuizLifecycle>,
        tasks: Arc<TaskRegistry>,
        syllabus: Arc<StaticSyllabus>,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            lifecycle,
            tasks,
            syllabus,
        }
    }

    /// Builds the single estimator, history and lifecycle for this process.
    pub fn build(
        config: &QuizConfig,
        syllabus: Arc<StaticSyllabus>,
        generator: Arc<dyn ItemGenerator>,
    ) -> Self {
        let irt = IrtConfig::default();
        let sampler =
            DiscriminationSampler::from_seed_option(irt.discrimination.clone(), config.rng_seed);
        let lifecycle = QuizLifecycle::new(
            Arc::new(AbilityEstimator::new(irt)),
            Arc::new(QuizHistory::new()),
            generator,
            sampler,
            LifecycleSettings {
                generation_timeout: config.generation_timeout,
                board: config.board.clone(),
                class_name: config.class_name.clone(),
            },
        );
        Self::new(Arc::new(lifecycle), Arc::new(TaskRegistry::new()), syllabus)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn lifecycle(&self) -> Arc<QuizLifecycle> {
        Arc::clone(&self.lifecycle)
    }

    pub fn tasks(&self) -> Arc<TaskRegistry> {
        Arc::clone(&self.tasks)
    }

    pub fn syllabus(&self) -> Arc<StaticSyllabus> {
        Arc::clone(&self.syllabus)
    }
}
