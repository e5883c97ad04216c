use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};

use crate::domain::JobStatus;

use super::{JobExecutor, JobTicket};

/// Pulls scheduled jobs off the queue and runs each one as its own task.
///
/// With a concurrency limit, a permit is taken before the task is spawned so
/// excess jobs stay queued as `Pending`.
pub struct JobWorker {
    receiver: mpsc::Receiver<JobTicket>,
    executor: Arc<JobExecutor>,
    limiter: Option<Arc<Semaphore>>,
}

impl JobWorker {
    pub fn new(
        receiver: mpsc::Receiver<JobTicket>,
        executor: Arc<JobExecutor>,
        max_concurrent: Option<usize>,
    ) -> Self {
        Self {
            receiver,
            executor,
            limiter: max_concurrent.map(|n| Arc::new(Semaphore::new(n.max(1)))),
        }
    }

    /// Returns once the queue is closed and every in-flight job has finished.
    pub async fn run(mut self) {
        tracing::info!(
            max_concurrent = self.limiter.as_ref().map(|s| s.available_permits()),
            "Job worker started"
        );
        let mut in_flight: JoinSet<JobStatus> = JoinSet::new();

        while let Some(ticket) = self.receiver.recv().await {
            let permit = match &self.limiter {
                Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
                None => None,
            };
            let executor = Arc::clone(&self.executor);

            tracing::debug!(job_id = %ticket.job_id, "Dispatching job");
            in_flight.spawn(async move {
                let _permit = permit;
                executor.execute(ticket).await
            });

            while let Some(joined) = in_flight.try_join_next() {
                log_finished(joined);
            }
        }

        tracing::info!(in_flight = in_flight.len(), "Job queue closed, draining");
        while let Some(joined) = in_flight.join_next().await {
            log_finished(joined);
        }
        tracing::info!("Job worker stopped");
    }
}

fn log_finished(joined: Result<JobStatus, JoinError>) {
    match joined {
        Ok(status) => tracing::debug!(status = %status, "Job task finished"),
        Err(e) => tracing::error!(error = %e, "Job task aborted"),
    }
}
