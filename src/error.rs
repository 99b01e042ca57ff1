//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,
}

/// Server-sent event stream errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Unexpected status {status}")]
    BadStatus { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<HttpError> for StreamError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, .. } => StreamError::BadStatus { status },
            HttpError::Unauthorized => StreamError::BadStatus { status: 401 },
            HttpError::NotFound(_) => StreamError::BadStatus { status: 404 },
            HttpError::RateLimited { .. } => StreamError::BadStatus { status: 429 },
            other => StreamError::ConnectionFailed(other.to_string()),
        }
    }
}

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not authenticated")]
    NotAuthenticated,
}
