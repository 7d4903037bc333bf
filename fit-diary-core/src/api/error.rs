//! Remote API error types.

use thiserror::Error;

/// Errors returned by [`DiaryApi`](super::DiaryApi) operations.
///
/// Cloneable so a single failure can be both logged and surfaced.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Transport-level failure (connection, DNS, TLS, body read)
    #[error("Request failed: {0}")]
    Http(String),

    /// Non-success HTTP status
    #[error("Server returned status {0}")]
    Status(u16),

    /// The credentials collaborator returned no usable response
    #[error("Not authenticated")]
    Unauthenticated,

    /// The server answered with `success: false`
    #[error("{0}")]
    Rejected(String),

    #[error("Empty response from server")]
    EmptyResponse,

    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ApiError::Status(500).to_string(), "Server returned status 500");
        assert_eq!(
            ApiError::Rejected("Could not save meals".to_string()).to_string(),
            "Could not save meals"
        );
        assert_eq!(ApiError::Unauthenticated.to_string(), "Not authenticated");
    }
}
