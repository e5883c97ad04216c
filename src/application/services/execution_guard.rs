use std::sync::Arc;

use crate::application::ports::{ArtifactStore, JobRegistry};
use crate::domain::{ArtifactRef, JobId};

const INTERRUPTED_ERROR: &str = "job execution was interrupted";

/// Owns a job's artifact for the duration of its execution and deletes it
/// exactly once.
///
/// The normal path awaits [`ExecutionGuard::release`]. If the owning future is
/// dropped or unwinds first, `Drop` hands the cleanup to the runtime instead:
/// a job that never reached a terminal state is failed, then the artifact is
/// deleted.
pub struct ExecutionGuard {
    registry: Arc<dyn JobRegistry>,
    store: Arc<dyn ArtifactStore>,
    job_id: JobId,
    artifact: ArtifactRef,
    released: bool,
}

impl ExecutionGuard {
    pub fn new(
        registry: Arc<dyn JobRegistry>,
        store: Arc<dyn ArtifactStore>,
        job_id: JobId,
        artifact: ArtifactRef,
    ) -> Self {
        Self {
            registry,
            store,
            job_id,
            artifact,
            released: false,
        }
    }

    pub fn artifact(&self) -> &ArtifactRef {
        &self.artifact
    }

    pub async fn release(mut self) {
        self.released = true;
        delete_artifact(self.store.as_ref(), &self.artifact).await;
    }
}

impl Drop for ExecutionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let registry = Arc::clone(&self.registry);
        let store = Arc::clone(&self.store);
        let job_id = self.job_id;
        let artifact = self.artifact.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(job_id = %job_id, artifact = %artifact, "Job execution dropped before finishing");
                handle.spawn(async move {
                    fail_unfinished(registry.as_ref(), job_id).await;
                    delete_artifact(store.as_ref(), &artifact).await;
                });
            }
            Err(_) => {
                tracing::warn!(
                    job_id = %job_id,
                    artifact = %artifact,
                    "Execution guard dropped outside a runtime, artifact left for startup purge"
                );
            }
        }
    }
}

async fn fail_unfinished(registry: &dyn JobRegistry, job_id: JobId) {
    let unfinished = registry
        .get(job_id)
        .await
        .is_some_and(|job| !job.status.is_terminal());
    if !unfinished {
        return;
    }
    if let Err(e) = registry.fail(job_id, INTERRUPTED_ERROR).await {
        tracing::warn!(error = %e, job_id = %job_id, "Failed to record interrupted job");
    }
}

async fn delete_artifact(store: &dyn ArtifactStore, artifact: &ArtifactRef) {
    match store.delete(artifact).await {
        Ok(()) => tracing::debug!(artifact = %artifact, "Artifact deleted"),
        Err(e) => tracing::warn!(error = %e, artifact = %artifact, "Failed to delete artifact"),
    }
}
