use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_format::AudioFormat;

/// Stand-in engine for local development: answers with a fixed transcript
/// after an optional delay.
pub struct ScaffoldTranscriptionEngine {
    transcript: String,
    delay: Duration,
}

impl ScaffoldTranscriptionEngine {
    pub fn new(transcript: String, delay: Duration) -> Self {
        Self { transcript, delay }
    }
}

#[async_trait]
impl TranscriptionEngine for ScaffoldTranscriptionEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        if AudioFormat::sniff(audio_data).is_none() {
            return Err(TranscriptionError::UnsupportedFormat(format!(
                "unrecognised audio container ({} bytes)",
                audio_data.len()
            )));
        }

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        tracing::debug!(bytes = audio_data.len(), "Scaffold transcription");
        Ok(self.transcript.clone())
    }
}
