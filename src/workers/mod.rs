mod task_sweep;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use crate::config::env_bool;
use crate::services::tasks::TaskRegistry;

const DEFAULT_TASK_SWEEP_SCHEDULE: &str = "0 */5 * * * *";

pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    tasks: Arc<TaskRegistry>,
    task_ttl: Duration,
}

impl WorkerManager {
    pub async fn new(tasks: Arc<TaskRegistry>, task_ttl: Duration) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await?;
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            tasks,
            task_ttl,
        })
    }

    pub async fn start(&self) -> Result<(), WorkerError> {
        let scheduler = self.scheduler.lock().await;

        if env_bool("ENABLE_TASK_SWEEP_WORKER").unwrap_or(true) {
            let schedule = std::env::var("TASK_SWEEP_SCHEDULE")
                .unwrap_or_else(|_| DEFAULT_TASK_SWEEP_SCHEDULE.to_string());
            let tasks = Arc::clone(&self.tasks);
            let ttl = self.task_ttl;
            let job = Job::new_async(schedule.as_str(), move |_uuid, _lock| {
                let tasks = Arc::clone(&tasks);
                Box::pin(async move {
                    task_sweep::sweep_finished_tasks(&tasks, ttl);
                })
            })?;
            scheduler.add(job).await?;
            info!(schedule = %schedule, ttl_secs = ttl.as_secs(), "task sweep worker scheduled");
        }

        scheduler.start().await?;
        info!("workers started");
        Ok(())
    }

    pub async fn stop(&self) {
        info!("stopping workers");
        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "error shutting down scheduler");
        }
        info!("workers stopped");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}
