use std::sync::Arc;

use crate::application::ports::{JobRegistry, TranscriptionEngine};
use crate::application::services::SubmissionService;
use crate::presentation::auth::ApiKeyAuthenticator;
use crate::presentation::config::Settings;

#[derive(Clone)]
pub struct AppState {
    pub submission_service: Arc<SubmissionService>,
    pub job_registry: Arc<dyn JobRegistry>,
    pub transcription_engine: Arc<dyn TranscriptionEngine>,
    pub authenticator: ApiKeyAuthenticator,
    pub settings: Arc<Settings>,
}
