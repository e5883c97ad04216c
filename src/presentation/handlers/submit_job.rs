use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{SchedulerError, SubmissionError};
use crate::presentation::state::AppState;

use super::{error_response, read_upload};

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub status: String,
    pub job_id: String,
}

#[tracing::instrument(skip(state, multipart))]
pub async fn submit_job_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    let submission = match read_upload(multipart).await {
        Ok(s) => s,
        Err(response) => return response,
    };

    match state.submission_service.submit(submission).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(SubmitJobResponse {
                status: "processing".to_string(),
                job_id: job_id.to_string(),
            }),
        )
            .into_response(),
        Err(e) => submission_error_response(e),
    }
}

fn submission_error_response(e: SubmissionError) -> Response {
    match e {
        SubmissionError::Validation(msg) => {
            tracing::warn!(error = %msg, "Rejected job submission");
            error_response(StatusCode::BAD_REQUEST, msg)
        }
        SubmissionError::Storage(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to store audio: {}", e),
        ),
        SubmissionError::Scheduling(SchedulerError::QueueFull) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Job queue is full, retry later",
        ),
        SubmissionError::Scheduling(SchedulerError::Closed) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Job worker unavailable",
        ),
    }
}
