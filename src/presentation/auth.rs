use std::sync::Arc;

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::http::header::{HeaderName, InvalidHeaderName};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

/// Checks the pre-shared service key carried in a request header.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    secret: Arc<str>,
    header: HeaderName,
}

impl ApiKeyAuthenticator {
    pub fn new(secret: &str, header_name: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            secret: Arc::from(secret),
            header: HeaderName::try_from(header_name.to_ascii_lowercase())?,
        })
    }

    pub fn header_name(&self) -> &HeaderName {
        &self.header
    }

    pub fn is_valid_key(&self, provided: &str) -> bool {
        constant_time_eq(provided.as_bytes(), self.secret.as_bytes())
    }
}

/// Rejects the request with `401` unless it carries the service key. Runs
/// before the body is read, so a rejected upload creates nothing.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authenticator = &state.authenticator;
    let provided = request
        .headers()
        .get(authenticator.header_name())
        .and_then(|v| v.to_str().ok());

    match provided {
        Some(key) if authenticator.is_valid_key(key) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected request with invalid service api key");
            unauthorized("Invalid Service API Key")
        }
        None => {
            tracing::warn!(header = %authenticator.header_name(), "Rejected request without service api key");
            unauthorized("Missing Service API Key")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
