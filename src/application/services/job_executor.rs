use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, CallbackDispatcher, CallbackPayload, JobRegistry,
    TranscriptionEngine, TranscriptionError,
};
use crate::domain::{ArtifactRef, CallbackTarget, JobId, JobStatus};

use super::ExecutionGuard;

/// Everything the executor needs to run one job.
#[derive(Debug, Clone)]
pub struct JobTicket {
    pub job_id: JobId,
    pub artifact: ArtifactRef,
    pub callback_target: Option<CallbackTarget>,
}

#[derive(Debug, Clone, Copy)]
pub struct ExecutorOptions {
    pub transcription_timeout: Option<Duration>,
    pub notify_on_failure: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            transcription_timeout: None,
            notify_on_failure: true,
        }
    }
}

/// Runs one transcription-and-callback cycle per job.
///
/// Order within a job: mark running, transcribe, record the terminal state,
/// notify the callback target, delete the artifact.
pub struct JobExecutor {
    registry: Arc<dyn JobRegistry>,
    artifact_store: Arc<dyn ArtifactStore>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    callback_dispatcher: Arc<dyn CallbackDispatcher>,
    options: ExecutorOptions,
}

impl JobExecutor {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        artifact_store: Arc<dyn ArtifactStore>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        callback_dispatcher: Arc<dyn CallbackDispatcher>,
        options: ExecutorOptions,
    ) -> Self {
        Self {
            registry,
            artifact_store,
            transcription_engine,
            callback_dispatcher,
            options,
        }
    }

    /// Never fails: every error ends up in the job's state.
    #[tracing::instrument(name = "job", skip(self, ticket), fields(job_id = %ticket.job_id))]
    pub async fn execute(&self, ticket: JobTicket) -> JobStatus {
        let JobTicket {
            job_id,
            artifact,
            callback_target,
        } = ticket;
        let guard = ExecutionGuard::new(
            Arc::clone(&self.registry),
            Arc::clone(&self.artifact_store),
            job_id,
            artifact,
        );

        self.record(job_id, JobStatus::Running, self.registry.mark_running(job_id).await);

        let status = match self.transcribe(guard.artifact()).await {
            Ok(transcript) => {
                tracing::info!(chars = transcript.len(), "Transcription completed");
                self.record(
                    job_id,
                    JobStatus::Completed,
                    self.registry.complete(job_id, &transcript).await,
                );
                if let Some(target) = &callback_target {
                    self.notify(target, CallbackPayload::completed(job_id, &transcript, target))
                        .await;
                }
                JobStatus::Completed
            }
            Err(e) => {
                let error_msg = e.to_string();
                tracing::warn!(error = %error_msg, "Transcription job failed");
                self.record(
                    job_id,
                    JobStatus::Failed,
                    self.registry.fail(job_id, &error_msg).await,
                );
                match &callback_target {
                    Some(target) if self.options.notify_on_failure => {
                        self.notify(target, CallbackPayload::failed(job_id, &error_msg, target))
                            .await;
                    }
                    Some(_) => tracing::debug!("Skipping failure callback"),
                    None => {}
                }
                JobStatus::Failed
            }
        };

        guard.release().await;
        status
    }

    async fn transcribe(&self, artifact: &ArtifactRef) -> Result<String, ExecutionError> {
        let data = self
            .artifact_store
            .fetch(artifact)
            .await
            .map_err(ExecutionError::Artifact)?;

        tracing::debug!(bytes = data.len(), "Starting audio transcription");

        let engine_call = AssertUnwindSafe(self.transcription_engine.transcribe(&data)).catch_unwind();

        let outcome = match self.options.transcription_timeout {
            Some(limit) => match tokio::time::timeout(limit, engine_call).await {
                Ok(outcome) => outcome,
                Err(_) => return Err(TranscriptionError::Timeout(limit.as_secs()).into()),
            },
            None => engine_call.await,
        };

        match outcome {
            Ok(result) => result.map_err(ExecutionError::Transcription),
            Err(panic) => Err(TranscriptionError::Panicked(panic_message(panic.as_ref())).into()),
        }
    }

    async fn notify(&self, target: &CallbackTarget, payload: CallbackPayload) {
        match self.callback_dispatcher.send(target, &payload).await {
            Ok(()) => tracing::info!(url = %target.redacted_url(), "Callback delivered"),
            Err(e) => tracing::warn!(
                error = %e,
                url = %target.redacted_url(),
                "Callback delivery failed"
            ),
        }
    }

    fn record<E: std::fmt::Display>(&self, job_id: JobId, status: JobStatus, result: Result<(), E>) {
        match result {
            Ok(()) => tracing::debug!(status = %status, "Job status transition"),
            Err(e) => tracing::error!(
                error = %e,
                job_id = %job_id,
                status = %status,
                "Failed to record job status"
            ),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ExecutionError {
    #[error("artifact: {0}")]
    Artifact(ArtifactStoreError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
