use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::services::tasks::TaskRegistry;

pub fn sweep_finished_tasks(tasks: &TaskRegistry, ttl: Duration) -> usize {
    let start = Instant::now();
    let removed = tasks.sweep_finished(ttl);

    if removed > 0 {
        info!(
            removed,
            remaining = tasks.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "task sweep completed"
        );
    } else {
        debug!(remaining = tasks.len(), "task sweep found nothing to remove");
    }
    removed
}
