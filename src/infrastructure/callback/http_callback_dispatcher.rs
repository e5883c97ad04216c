use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{CallbackDeliveryError, CallbackDispatcher, CallbackPayload};
use crate::domain::CallbackTarget;

/// Used when `callback.timeout_secs` is not configured.
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(30);

/// POSTs the payload as JSON, once. Any 2xx counts as delivered.
pub struct HttpCallbackDispatcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpCallbackDispatcher {
    pub fn new(timeout: Duration) -> Result<Self, CallbackDeliveryError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CallbackDeliveryError::Network(format!("client: {}", e)))?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl CallbackDispatcher for HttpCallbackDispatcher {
    async fn send(
        &self,
        target: &CallbackTarget,
        payload: &CallbackPayload,
    ) -> Result<(), CallbackDeliveryError> {
        tracing::debug!(url = %target.redacted_url(), job_id = %payload.job_id, "Sending callback");

        let response = self
            .client
            .post(target.url().clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallbackDeliveryError::Timeout(self.timeout.as_secs())
                } else {
                    CallbackDeliveryError::Network(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CallbackDeliveryError::Rejected(status.as_u16()));
        }

        Ok(())
    }
}
