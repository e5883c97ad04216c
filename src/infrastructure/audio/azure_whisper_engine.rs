use async_trait::async_trait;
use reqwest::{StatusCode, multipart};
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::audio_format::AudioFormat;

/// Whisper served from an Azure OpenAI deployment.
///
/// The deployment is addressed by path and `api-version` query, authenticated
/// with the `api-key` header, and answers with a JSON body.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    transcriptions_url: String,
    deployment: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        let transcriptions_url = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        Self {
            client: reqwest::Client::new(),
            transcriptions_url,
            deployment: deployment.to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn audio_part(audio_data: &[u8]) -> Result<multipart::Part, TranscriptionError> {
        let format = AudioFormat::sniff(audio_data).unwrap_or(AudioFormat::Wav);
        multipart::Part::bytes(audio_data.to_vec())
            .file_name(format.file_name())
            .mime_str(format.mime())
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))
    }
}

#[derive(Deserialize)]
struct Transcription {
    text: String,
}

/// Azure wraps failures as `{"error": {"code": .., "message": ..}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

fn deployment_error(status: StatusCode, body: &str) -> TranscriptionError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error: ErrorDetail {
                code: Some(code),
                message,
            },
        }) => format!("{}: {}", code, message),
        Ok(envelope) => envelope.error.message,
        Err(_) => body.to_string(),
    };

    // 400 means the deployment could not read the upload.
    if status == StatusCode::BAD_REQUEST {
        TranscriptionError::DecodingFailed(message)
    } else {
        TranscriptionError::ApiRequestFailed(format!("status {}: {}", status, message))
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(&self, audio_data: &[u8]) -> Result<String, TranscriptionError> {
        if audio_data.is_empty() {
            return Err(TranscriptionError::UnsupportedFormat("empty audio".to_string()));
        }

        let form = multipart::Form::new().part("file", Self::audio_part(audio_data)?);

        tracing::debug!(
            deployment = %self.deployment,
            bytes = audio_data.len(),
            "Submitting audio to Azure deployment"
        );

        let response = self
            .client
            .post(&self.transcriptions_url)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = deployment_error(status, &body);
            tracing::warn!(
                deployment = %self.deployment,
                status = %status,
                error = %err,
                "Azure deployment rejected audio"
            );
            return Err(err);
        }

        let transcription: Transcription = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

        tracing::info!(
            deployment = %self.deployment,
            chars = transcription.text.len(),
            "Azure transcription completed"
        );

        Ok(transcription.text.trim().to_string())
    }
}
