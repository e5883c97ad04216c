use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{CallbackTarget, Job, JobId};

use super::RegistryError;

/// Source of truth for what happened to a job.
///
/// Transitions overwrite status and the matching result/error field. Calling
/// them out of order is allowed and the last write wins; the job executor is
/// the only caller and makes each transition once per job.
#[async_trait]
pub trait JobRegistry: Send + Sync {
    /// Allocates a fresh id and records a `Pending` job under it.
    async fn create(&self, callback_target: Option<CallbackTarget>) -> JobId;

    async fn get(&self, id: JobId) -> Option<Job>;

    async fn mark_running(&self, id: JobId) -> Result<(), RegistryError>;

    async fn complete(&self, id: JobId, transcript: &str) -> Result<(), RegistryError>;

    async fn fail(&self, id: JobId, error: &str) -> Result<(), RegistryError>;

    /// Forgets a job that was never handed to the executor. Returns whether
    /// it existed.
    async fn discard(&self, id: JobId) -> bool;

    /// Drops terminal jobs last updated before `older_than`. Returns how many
    /// were removed.
    async fn evict_finished(&self, older_than: DateTime<Utc>) -> usize;
}
