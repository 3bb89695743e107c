//! Gemini-specific errors.

use nightcard_fetch::HttpError;
use thiserror::Error;

/// Gemini-specific errors.
///
/// These never leave the provider: every variant ends in a fallback message.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The API key was rejected.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Rate limited by API.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// The prompt was blocked by safety filters.
    #[error("Prompt blocked: {0}")]
    Blocked(String),

    /// Invalid response from API.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<HttpError> for GeminiError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Request(e) if e.is_timeout() => {
                GeminiError::HttpError(format!("Request timed out: {e}"))
            }
            HttpError::Request(e) if e.is_connect() => {
                GeminiError::HttpError(format!("Connection failed: {e}"))
            }
            other => GeminiError::HttpError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::from(HttpError::Request(err))
    }
}
