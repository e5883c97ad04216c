use std::collections::BTreeMap;
use std::sync::Arc;

use bytes::Bytes;

use crate::application::ports::{ArtifactStore, ArtifactStoreError, JobRegistry};
use crate::domain::{CallbackTarget, JobId, extension_of};

use super::{JobScheduler, JobTicket, QueueStatus, SchedulerError};

/// An upload as read off the wire, before validation.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    pub filename: Option<String>,
    pub data: Bytes,
    pub callback_url: Option<String>,
    pub correlation: BTreeMap<String, String>,
}

/// Turns an upload into a scheduled job and returns without waiting for it.
///
/// A submission that cannot be stored or scheduled is discarded from the
/// registry, so callers only ever observe jobs that were accepted.
pub struct SubmissionService {
    registry: Arc<dyn JobRegistry>,
    artifact_store: Arc<dyn ArtifactStore>,
    scheduler: JobScheduler,
    require_callback: bool,
}

impl SubmissionService {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        artifact_store: Arc<dyn ArtifactStore>,
        scheduler: JobScheduler,
        require_callback: bool,
    ) -> Self {
        Self {
            registry,
            artifact_store,
            scheduler,
            require_callback,
        }
    }

    pub fn queue_status(&self) -> QueueStatus {
        self.scheduler.status()
    }

    pub async fn submit(&self, submission: Submission) -> Result<JobId, SubmissionError> {
        let callback_target = self.callback_target(&submission)?;

        if submission.data.is_empty() {
            return Err(SubmissionError::Validation(
                "Uploaded file is empty".to_string(),
            ));
        }

        let extension = submission.filename.as_deref().and_then(extension_of);
        let has_callback = callback_target.is_some();
        let job_id = self.registry.create(callback_target.clone()).await;

        let artifact = match self
            .artifact_store
            .save(&job_id, submission.data, extension)
            .await
        {
            Ok(artifact) => artifact,
            Err(e) => {
                tracing::error!(error = %e, job_id = %job_id, "Failed to store audio artifact");
                self.registry.discard(job_id).await;
                return Err(SubmissionError::Storage(e));
            }
        };

        let ticket = JobTicket {
            job_id,
            artifact: artifact.clone(),
            callback_target,
        };

        if let Err(e) = self.scheduler.schedule(ticket) {
            tracing::error!(error = %e, job_id = %job_id, "Failed to schedule job");
            self.registry.discard(job_id).await;
            if let Err(del_err) = self.artifact_store.delete(&artifact).await {
                tracing::warn!(
                    error = %del_err,
                    artifact = %artifact,
                    "Failed to delete artifact of unscheduled job"
                );
            }
            return Err(SubmissionError::Scheduling(e));
        }

        tracing::info!(
            job_id = %job_id,
            artifact = %artifact,
            has_callback,
            "Transcription job scheduled"
        );

        Ok(job_id)
    }

    fn callback_target(
        &self,
        submission: &Submission,
    ) -> Result<Option<CallbackTarget>, SubmissionError> {
        let url = submission
            .callback_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty());

        let Some(url) = url else {
            if self.require_callback {
                return Err(SubmissionError::Validation(
                    "callback_url is required".to_string(),
                ));
            }
            if !submission.correlation.is_empty() {
                tracing::debug!("Correlation fields ignored without callback_url");
            }
            return Ok(None);
        };

        if self.require_callback && submission.correlation.is_empty() {
            return Err(SubmissionError::Validation(
                "correlation data is required with callback_url".to_string(),
            ));
        }

        CallbackTarget::new(url, submission.correlation.clone())
            .map(Some)
            .map_err(|e| SubmissionError::Validation(e.to_string()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("validation: {0}")]
    Validation(String),
    #[error("storage: {0}")]
    Storage(ArtifactStoreError),
    #[error("scheduling: {0}")]
    Scheduling(SchedulerError),
}
