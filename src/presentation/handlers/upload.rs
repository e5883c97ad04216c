use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::Response;

use crate::application::services::Submission;

use super::error_response;

const FILE_FIELD: &str = "file";
const CALLBACK_URL_FIELD: &str = "callback_url";

/// Splits a multipart upload into the audio file, the callback URL and the
/// remaining text fields, which become correlation data.
pub async fn read_upload(mut multipart: Multipart) -> Result<Submission, Response> {
    let mut submission = Submission::default();
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(String::from);

        if filename.is_some() || name == FILE_FIELD {
            if has_file {
                tracing::warn!("Upload with more than one file");
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "Only one file may be uploaded",
                ));
            }
            submission.data = field.bytes().await.map_err(multipart_error)?;
            submission.filename = filename;
            has_file = true;
        } else if name == CALLBACK_URL_FIELD {
            submission.callback_url = Some(field.text().await.map_err(multipart_error)?);
        } else if !name.is_empty() {
            let value = field.text().await.map_err(multipart_error)?;
            submission.correlation.insert(name, value);
        }
    }

    if !has_file {
        tracing::warn!("Upload request with no file");
        return Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"));
    }

    tracing::debug!(
        filename = ?submission.filename,
        bytes = submission.data.len(),
        correlation_fields = submission.correlation.len(),
        "Upload received"
    );

    Ok(submission)
}

fn multipart_error(e: MultipartError) -> Response {
    tracing::warn!(error = %e, "Failed to read multipart");
    error_response(
        e.status(),
        format!("Failed to read multipart: {}", e.body_text()),
    )
}
