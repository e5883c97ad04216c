use std::path::PathBuf;
use std::sync::Arc;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::local_store::LocalArtifactStore;
use super::memory_store::InMemoryArtifactStore;

pub struct ArtifactStoreFactory;

impl ArtifactStoreFactory {
    pub fn create(settings: &StorageSettings) -> Result<Arc<dyn ArtifactStore>, ArtifactStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let path = PathBuf::from(&settings.local_path);
                let store = LocalArtifactStore::new(path)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::Memory => Ok(Arc::new(InMemoryArtifactStore::new())),
        }
    }
}
