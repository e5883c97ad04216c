use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{TranscriptionProviderSetting, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;
use super::scaffold_engine::ScaffoldTranscriptionEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        match settings.provider {
            TranscriptionProviderSetting::OpenAi => {
                if settings.api_key.is_none() && settings.base_url.is_none() {
                    return Err(TranscriptionError::ModelLoadFailed(
                        "api_key or base_url required for the openai provider".to_string(),
                    ));
                }
                let engine = OpenAiWhisperEngine::new(
                    settings.api_key.clone(),
                    settings.base_url.clone(),
                    Some(settings.model.clone()),
                );
                Ok(Arc::new(engine))
            }
            TranscriptionProviderSetting::Azure => {
                let base_url = settings.base_url.as_deref().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed("base_url required for azure".into())
                })?;
                let key = settings.api_key.as_deref().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed("api_key required for azure".into())
                })?;
                let deployment = settings.azure_deployment.as_deref().ok_or_else(|| {
                    TranscriptionError::ModelLoadFailed("azure_deployment required".into())
                })?;
                let engine = AzureWhisperEngine::new(
                    base_url,
                    deployment,
                    key,
                    &settings.azure_api_version,
                );
                Ok(Arc::new(engine))
            }
            TranscriptionProviderSetting::Scaffold => {
                let engine = ScaffoldTranscriptionEngine::new(
                    settings.scaffold_transcript.clone(),
                    Duration::from_millis(settings.scaffold_delay_ms),
                );
                Ok(Arc::new(engine))
            }
        }
    }
}
