//! Error types for calls to the planner server.

use thiserror::Error;

/// Errors that can occur while talking to the planner server.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UpstreamError {
    /// Network/HTTP request failed
    #[error("Network error: {message}")]
    Network { message: String },

    /// The request did not finish within the configured timeout
    #[error("Request timed out: {message}")]
    Timeout { message: String },

    /// Server returned an unexpected status
    #[error("Unexpected response: {message}")]
    UnexpectedResponse { message: String },

    /// Server body did not match the expected JSON shape
    #[error("Could not decode response: {message}")]
    Decode { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// Circuit breaker is open due to repeated failures
    #[error("Circuit breaker open - too many recent failures")]
    CircuitBreakerOpen,
}

impl UpstreamError {
    /// Returns true if this error is potentially transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::Network { .. }
                | UpstreamError::Timeout { .. }
                | UpstreamError::UnexpectedResponse { .. }
        )
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        let message = err.to_string();
        if err.is_timeout() {
            UpstreamError::Timeout { message }
        } else if err.is_decode() {
            UpstreamError::Decode { message }
        } else {
            UpstreamError::Network { message }
        }
    }
}

impl From<url::ParseError> for UpstreamError {
    fn from(err: url::ParseError) -> Self {
        UpstreamError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode {
            message: err.to_string(),
        }
    }
}
