mod artifact_ref;
mod callback_target;
mod job;
mod job_id;
mod job_status;

pub use artifact_ref::{ArtifactRef, extension_of};
pub use callback_target::{CallbackTarget, CallbackTargetError, RESERVED_CORRELATION_KEYS};
pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
