mod execution_guard;
mod job_executor;
mod job_retention;
mod job_scheduler;
mod job_worker;
mod submission_service;

pub use execution_guard::ExecutionGuard;
pub use job_executor::{ExecutorOptions, JobExecutor, JobTicket};
pub use job_retention::JobRetention;
pub use job_scheduler::{JobScheduler, QueueStatus, SchedulerError, job_queue};
pub use job_worker::JobWorker;
pub use submission_service::{Submission, SubmissionError, SubmissionService};
