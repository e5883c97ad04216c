use crate::domain::JobId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("job not found: {0}")]
    NotFound(JobId),
}
