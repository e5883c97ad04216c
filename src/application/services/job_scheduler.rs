use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::JobTicket;

/// Creates the bounded queue between submissions and the [`super::JobWorker`].
pub fn job_queue(capacity: usize) -> (JobScheduler, mpsc::Receiver<JobTicket>) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    (JobScheduler { sender }, receiver)
}

/// Submission-side handle of the job queue. Scheduling never waits; once
/// every handle is dropped the worker drains and stops.
#[derive(Clone)]
pub struct JobScheduler {
    sender: mpsc::Sender<JobTicket>,
}

impl JobScheduler {
    pub fn schedule(&self, ticket: JobTicket) -> Result<(), SchedulerError> {
        self.sender.try_send(ticket).map_err(|e| match e {
            TrySendError::Full(_) => SchedulerError::QueueFull,
            TrySendError::Closed(_) => SchedulerError::Closed,
        })
    }

    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            capacity: self.sender.max_capacity(),
            free: self.sender.capacity(),
            accepting: !self.sender.is_closed(),
        }
    }
}

/// Point-in-time view of the job queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct QueueStatus {
    pub capacity: usize,
    pub free: usize,
    pub accepting: bool,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("job queue is full")]
    QueueFull,
    #[error("job worker is not running")]
    Closed,
}
