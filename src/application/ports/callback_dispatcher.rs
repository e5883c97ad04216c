use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{CallbackTarget, JobId};

/// Delivers a job outcome to the caller's webhook. One attempt, no retry.
#[async_trait]
pub trait CallbackDispatcher: Send + Sync {
    async fn send(
        &self,
        target: &CallbackTarget,
        payload: &CallbackPayload,
    ) -> Result<(), CallbackDeliveryError>;
}

/// JSON body of the outbound callback: `{job_id, transcript | error, ...correlation}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallbackPayload {
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub correlation: BTreeMap<String, String>,
}

impl CallbackPayload {
    pub fn completed(job_id: JobId, transcript: &str, target: &CallbackTarget) -> Self {
        Self {
            job_id: job_id.to_string(),
            transcript: Some(transcript.to_string()),
            error: None,
            correlation: target.correlation().clone(),
        }
    }

    pub fn failed(job_id: JobId, error: &str, target: &CallbackTarget) -> Self {
        Self {
            job_id: job_id.to_string(),
            transcript: None,
            error: Some(error.to_string()),
            correlation: target.correlation().clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CallbackDeliveryError {
    #[error("callback rejected with status {0}")]
    Rejected(u16),
    #[error("callback timed out after {0}s")]
    Timeout(u64),
    #[error("callback network error: {0}")]
    Network(String),
}
