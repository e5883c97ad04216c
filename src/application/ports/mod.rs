mod artifact_store;
mod callback_dispatcher;
mod job_registry;
mod registry_error;
mod transcription_engine;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use callback_dispatcher::{CallbackDeliveryError, CallbackDispatcher, CallbackPayload};
pub use job_registry::JobRegistry;
pub use registry_error::RegistryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
