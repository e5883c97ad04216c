use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::application::ports::{JobRegistry, RegistryError};
use crate::domain::{CallbackTarget, Job, JobId};

/// Process-local job registry. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryJobRegistry {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }

    async fn update(&self, id: JobId, apply: impl FnOnce(&mut Job)) -> Result<(), RegistryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&id).ok_or(RegistryError::NotFound(id))?;
        apply(job);
        Ok(())
    }
}

#[async_trait::async_trait]
impl JobRegistry for InMemoryJobRegistry {
    async fn create(&self, callback_target: Option<CallbackTarget>) -> JobId {
        let mut jobs = self.jobs.write().await;
        let mut job = Job::new(callback_target);
        // v4 collisions are not expected, but an id must never be reused.
        while jobs.contains_key(&job.id) {
            job.id = JobId::new();
        }
        let id = job.id;
        jobs.insert(id, job);
        id
    }

    async fn get(&self, id: JobId) -> Option<Job> {
        self.jobs.read().await.get(&id).cloned()
    }

    async fn mark_running(&self, id: JobId) -> Result<(), RegistryError> {
        self.update(id, Job::mark_running).await
    }

    async fn complete(&self, id: JobId, transcript: &str) -> Result<(), RegistryError> {
        self.update(id, |job| job.complete(transcript.to_string()))
            .await
    }

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RegistryError> {
        self.update(id, |job| job.fail(error.to_string())).await
    }

    async fn discard(&self, id: JobId) -> bool {
        self.jobs.write().await.remove(&id).is_some()
    }

    async fn evict_finished(&self, older_than: DateTime<Utc>) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !(job.status.is_terminal() && job.updated_at < older_than));
        before - jobs.len()
    }
}
