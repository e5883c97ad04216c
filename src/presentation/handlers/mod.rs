mod error;
mod health;
mod job_status;
mod submit_job;
mod transcribe_sync;
mod upload;

pub use error::{ErrorResponse, error_response};
pub use health::health_handler;
pub use job_status::job_status_handler;
pub use submit_job::submit_job_handler;
pub use transcribe_sync::transcribe_sync_handler;
pub use upload::read_upload;
