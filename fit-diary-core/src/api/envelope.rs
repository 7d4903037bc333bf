//! The `{ success, data, message }` wrapper every endpoint answers with.

use serde::Deserialize;

use super::error::ApiError;

const GENERIC_FAILURE: &str = "The request was not successful.";

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default, deserialize_with = "crate::serde_util::flag")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Server-provided explanation, preferring `message` over `error`.
    pub fn reason(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }

    /// Fails with [`ApiError::Rejected`] unless `success` is set.
    pub fn ensure_success(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            let reason = self.reason().unwrap_or(GENERIC_FAILURE).to_string();
            Err(ApiError::Rejected(reason))
        }
    }

    pub fn into_data(self) -> Result<T, ApiError> {
        self.ensure_success()?
            .data
            .ok_or_else(|| ApiError::InvalidResponse("missing data".to_string()))
    }
}
