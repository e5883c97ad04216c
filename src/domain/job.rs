use super::{CallbackTarget, JobId, JobStatus};
use chrono::{DateTime, Utc};

/// One submitted transcription request, tracked from submission to its
/// terminal outcome.
///
/// `result` is only ever set while `Completed` and `error` only while
/// `Failed`; every transition overwrites both fields.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub result: Option<String>,
    pub error: Option<String>,
    pub callback_target: Option<CallbackTarget>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(callback_target: Option<CallbackTarget>) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            status: JobStatus::Pending,
            result: None,
            error: None,
            callback_target,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_running(&mut self) {
        self.transition(JobStatus::Running, None, None);
    }

    pub fn complete(&mut self, transcript: String) {
        self.transition(JobStatus::Completed, Some(transcript), None);
    }

    pub fn fail(&mut self, error: String) {
        self.transition(JobStatus::Failed, None, Some(error));
    }

    fn transition(&mut self, status: JobStatus, result: Option<String>, error: Option<String>) {
        self.status = status;
        self.result = result;
        self.error = error;
        self.updated_at = Utc::now();
    }
}
