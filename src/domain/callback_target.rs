use std::collections::BTreeMap;

use url::Url;

/// Field names that the callback payload already uses. Correlation data must
/// not shadow them.
pub const RESERVED_CORRELATION_KEYS: &[&str] =
    &["file", "callback_url", "job_id", "transcript", "error", "status"];

/// Where to deliver a job outcome, plus the caller's correlation data that is
/// echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackTarget {
    url: Url,
    correlation: BTreeMap<String, String>,
}

impl CallbackTarget {
    pub fn new(
        url: &str,
        correlation: BTreeMap<String, String>,
    ) -> Result<Self, CallbackTargetError> {
        let url = Url::parse(url.trim())
            .map_err(|e| CallbackTargetError::InvalidUrl(format!("{}: {}", url, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CallbackTargetError::UnsupportedScheme(
                url.scheme().to_string(),
            ));
        }

        if let Some(key) = correlation
            .keys()
            .find(|k| RESERVED_CORRELATION_KEYS.contains(&k.as_str()))
        {
            return Err(CallbackTargetError::ReservedKey(key.clone()));
        }

        Ok(Self { url, correlation })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn correlation(&self) -> &BTreeMap<String, String> {
        &self.correlation
    }

    /// The URL without credentials or query string, safe to put in logs.
    pub fn redacted_url(&self) -> String {
        let mut url = self.url.clone();
        let _ = url.set_username("");
        let _ = url.set_password(None);
        url.set_query(None);
        url.set_fragment(None);
        url.to_string()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackTargetError {
    #[error("invalid callback url: {0}")]
    InvalidUrl(String),
    #[error("unsupported callback url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("correlation field name is reserved: {0}")]
    ReservedKey(String),
}
