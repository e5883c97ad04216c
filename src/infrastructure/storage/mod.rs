mod local_store;
mod memory_store;
mod store_factory;

pub use local_store::LocalArtifactStore;
pub use memory_store::InMemoryArtifactStore;
pub use store_factory::ArtifactStoreFactory;
