use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use object_store::{ObjectStore, PutPayload};

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::{ArtifactRef, JobId};

/// Artifacts as files under a scratch directory.
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    base_path: PathBuf,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&base_path).map_err(ArtifactStoreError::Io)?;
        let fs = LocalFileSystem::new_with_prefix(&base_path)
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            base_path,
        })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn save(
        &self,
        job_id: &JobId,
        data: Bytes,
        extension: Option<&str>,
    ) -> Result<ArtifactRef, ArtifactStoreError> {
        let artifact = ArtifactRef::new(job_id, extension);
        let store_path = StorePath::from(artifact.as_str());
        let size = data.len();

        self.inner
            .put(&store_path, PutPayload::from(data))
            .await
            .map_err(|e| ArtifactStoreError::WriteFailed(e.to_string()))?;

        tracing::debug!(artifact = %artifact, bytes = size, "Artifact stored");
        Ok(artifact)
    }

    async fn fetch(&self, artifact: &ArtifactRef) -> Result<Vec<u8>, ArtifactStoreError> {
        let store_path = StorePath::from(artifact.as_str());
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                ArtifactStoreError::NotFound(artifact.to_string())
            }
            other => ArtifactStoreError::ReadFailed(other.to_string()),
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| ArtifactStoreError::ReadFailed(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    async fn delete(&self, artifact: &ArtifactRef) -> Result<(), ArtifactStoreError> {
        let store_path = StorePath::from(artifact.as_str());
        match self.inner.delete(&store_path).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(ArtifactStoreError::DeleteFailed(e.to_string())),
        }
    }

    async fn exists(&self, artifact: &ArtifactRef) -> Result<bool, ArtifactStoreError> {
        let store_path = StorePath::from(artifact.as_str());
        match self.inner.head(&store_path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(ArtifactStoreError::ReadFailed(e.to_string())),
        }
    }

    /// Deletes top-level artifact keys only. Foreign files and anything in a
    /// subdirectory are left alone.
    async fn purge(&self) -> Result<usize, ArtifactStoreError> {
        let listing = self
            .inner
            .list_with_delimiter(None)
            .await
            .map_err(|e| ArtifactStoreError::ReadFailed(e.to_string()))?;

        let mut removed = 0;
        for meta in listing.objects {
            let Some(artifact) = meta.location.filename().and_then(ArtifactRef::from_key) else {
                tracing::debug!(path = %meta.location, "Skipping non-artifact file");
                continue;
            };
            match self.inner.delete(&meta.location).await {
                Ok(()) | Err(object_store::Error::NotFound { .. }) => removed += 1,
                Err(e) => {
                    tracing::warn!(error = %e, artifact = %artifact, "Failed to purge artifact");
                }
            }
        }

        Ok(removed)
    }
}
