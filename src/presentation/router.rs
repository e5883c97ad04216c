use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::auth::auth_middleware;
use crate::presentation::handlers::{
    health_handler, job_status_handler, submit_job_handler, transcribe_sync_handler,
};
use crate::presentation::state::AppState;

const BYTES_PER_MB: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let body_limit = DefaultBodyLimit::max(
        state
            .settings
            .server
            .max_upload_mb
            .saturating_mul(BYTES_PER_MB),
    );

    let mut protected = Router::new()
        .route("/submit_job", post(submit_job_handler))
        .route("/jobs/{job_id}", get(job_status_handler));

    if state.settings.server.enable_sync_endpoint {
        protected = protected.route("/transcribe_sync", post(transcribe_sync_handler));
    }

    let protected =
        protected.route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .merge(protected)
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
