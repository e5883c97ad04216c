use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::presentation::state::AppState;

use super::{error_response, read_upload};

#[derive(Debug, Serialize)]
pub struct TranscribeSyncResponse {
    pub status: String,
    pub transcript: String,
}

/// Transcribes inline without touching the job registry. Meant for testing
/// an engine end to end.
#[tracing::instrument(skip(state, multipart))]
pub async fn transcribe_sync_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let submission = match read_upload(multipart).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    if submission.data.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Uploaded file is empty");
    }

    tracing::info!(filename = ?submission.filename, "Starting synchronous transcription");

    match state.transcription_engine.transcribe(&submission.data).await {
        Ok(transcript) => (
            StatusCode::OK,
            Json(TranscribeSyncResponse {
                status: "success".to_string(),
                transcript,
            }),
        )
            .into_response(),
        Err(e) if e.is_bad_input() => {
            tracing::warn!(error = %e, "Synchronous transcription rejected input");
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        Err(e) => {
            tracing::error!(error = %e, "Synchronous transcription failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
