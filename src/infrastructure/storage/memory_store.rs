use std::collections::HashMap;

use bytes::Bytes;
use tokio::sync::RwLock;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::{ArtifactRef, JobId};

/// Keeps artifacts in process memory. Used by scaffold mode and tests.
#[derive(Default)]
pub struct InMemoryArtifactStore {
    artifacts: RwLock<HashMap<ArtifactRef, Bytes>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.artifacts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.artifacts.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn save(
        &self,
        job_id: &JobId,
        data: Bytes,
        extension: Option<&str>,
    ) -> Result<ArtifactRef, ArtifactStoreError> {
        let artifact = ArtifactRef::new(job_id, extension);
        self.artifacts.write().await.insert(artifact.clone(), data);
        Ok(artifact)
    }

    async fn fetch(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactStoreError> {
        self.artifacts
            .read()
            .await
            .get(artifact)
            .map(|data| data.to_vec())
            .ok_or_else(|| ArtifactStoreError::NotFound(artifact.to_string()))
    }

    async fn delete(&self, artifact: &ArtifactRef) -> Result<(), ArtifactStoreError> {
        self.artifacts.write().await.remove(artifact);
        Ok(())
    }

    async fn exists(&self, artifact: &ArtifactRef) -> Result<bool, ArtifactStoreError> {
        Ok(self.artifacts.read().await.contains_key(artifact))
    }

    async fn purge(&self) -> Result<usize, ArtifactStoreError> {
        let mut artifacts = self.artifacts.write().await;
        let removed = artifacts.len();
        artifacts.clear();
        Ok(removed)
    }
}
