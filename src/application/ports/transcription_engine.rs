use async_trait::async_trait;

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("transcription timed out after {0}s")]
    Timeout(u64),
    #[error("transcription engine panicked: {0}")]
    Panicked(String),
}

impl TranscriptionError {
    /// True when the input itself is at fault rather than the engine.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            TranscriptionError::DecodingFailed(_) | TranscriptionError::UnsupportedFormat(_)
        )
    }
}
