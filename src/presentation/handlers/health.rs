use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use crate::application::services::QueueStatus;
use crate::presentation::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub queue: QueueStatus,
}

/// Unauthenticated liveness for `/` and `/health`. Turns 503 once the job
/// worker stops taking tickets, while the process is still draining.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let queue = state.submission_service.queue_status();
    let (code, status) = if queue.accepting {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "draining")
    };
    (code, Json(HealthResponse { status, queue }))
}
