use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::jobs::job::{BackgroundJob, JobSchedule};

/// Runs registered jobs on their schedule until stopped.
pub struct Scheduler {
    jobs: Vec<Arc<dyn BackgroundJob>>,
    handles: Vec<JoinHandle<()>>,
    shutdown_token: CancellationToken,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            jobs: Vec::new(),
            handles: Vec::new(),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn register_job(&mut self, job: Arc<dyn BackgroundJob>) {
        info!("Registered background job: {}", job.id());
        self.jobs.push(job);
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_running(&self) -> bool {
        !self.handles.is_empty() && !self.shutdown_token.is_cancelled()
    }

    /// Spawns one task per registered job. Calling it on a running scheduler is a no-op.
    pub fn start(&mut self) {
        if self.is_running() {
            warn!("Scheduler is already running");
            return;
        }
        if self.shutdown_token.is_cancelled() {
            self.shutdown_token = CancellationToken::new();
        }

        for job in &self.jobs {
            let JobSchedule::Interval(period) = job.schedule();
            let job = Arc::clone(job);
            let token = self.shutdown_token.child_token();

            self.handles.push(tokio::spawn(async move {
                let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
                loop {
                    tokio::select! {
                        _ = token.cancelled() => {
                            debug!("Job {} received shutdown signal", job.id());
                            break;
                        }
                        _ = ticker.tick() => {
                            debug!("Running job {}", job.id());
                            if let Err(e) = job.execute().await {
                                error!("Job {} failed: {}", job.id(), e);
                            }
                        }
                    }
                }
            }));
        }

        info!("Scheduler started with {} jobs", self.jobs.len());
    }

    /// Cancels every job task and waits for them to finish.
    pub async fn stop(&mut self) {
        self.shutdown_token.cancel();

        for handle in self.handles.drain(..) {
            if let Err(e) = handle.await {
                warn!("Job task ended abnormally: {}", e);
            }
        }

        info!("Scheduler stopped");
    }
}
