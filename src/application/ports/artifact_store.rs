use std::io;

use bytes::Bytes;

use crate::domain::{ArtifactRef, JobId};

/// Temporary home of uploaded audio while its job is in flight.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Writes the audio under a key derived from `job_id`.
    async fn save(
        &self,
        job_id: &JobId,
        data: Bytes,
        extension: Option<&str>,
    ) -> Result<ArtifactRef, ArtifactStoreError>;

    async fn fetch(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactStoreError>;

    /// Removes the artifact. Deleting an absent artifact succeeds.
    async fn delete(&self, artifact: &ArtifactRef) -> Result<(), ArtifactStoreError>;

    async fn exists(&self, artifact: &ArtifactRef) -> Result<bool, ArtifactStoreError>;

    /// Removes every stored artifact. Run at startup, when no job from a
    /// previous process can still own one.
    async fn purge(&self) -> Result<usize, ArtifactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("write failed: {0}")]
    WriteFailed(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("read failed: {0}")]
    ReadFailed(String),
    #[error("delete failed: {0}")]
    DeleteFailed(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
