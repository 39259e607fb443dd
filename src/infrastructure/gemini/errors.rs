use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::ports::GenerationError;

/// Errors that can occur when interacting with the Gemini API
#[derive(Error, Debug)]
pub enum GeminiApiError {
    /// Invalid request parameters (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid or missing API key (HTTP 401, or 400 with `API_KEY_INVALID`)
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    /// Forbidden - permission denied (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Model or resource not found (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Quota or rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Server error from the API (HTTP 5xx)
    #[error("Server error ({0}): {1}")]
    ServerError(StatusCode, String),

    /// Network or connection error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Unknown or unexpected error
    #[error("Unknown error ({0}): {1}")]
    UnknownError(StatusCode, String),
}

/// Google's error envelope: `{"error": {"code": 429, "message": "...", "status": "RESOURCE_EXHAUSTED"}}`
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

impl GeminiApiError {
    /// Classify an error response from its status code and body.
    ///
    /// The human message is taken from Google's error envelope when the body
    /// has one, otherwise the raw body is used.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let message = envelope
            .as_ref()
            .map(|e| e.error.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| body.trim().to_string());
        let key_invalid = envelope.as_ref().is_some_and(|e| {
            e.error
                .details
                .iter()
                .any(|d| d.get("reason").and_then(|r| r.as_str()) == Some("API_KEY_INVALID"))
        });

        match status {
            StatusCode::BAD_REQUEST if key_invalid => Self::InvalidApiKey,
            StatusCode::BAD_REQUEST => Self::InvalidRequest(message),
            StatusCode::UNAUTHORIZED => Self::InvalidApiKey,
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimitExceeded(message),
            status if status.is_server_error() => Self::ServerError(status, message),
            status => {
                let status_text = envelope.map(|e| e.error.status).unwrap_or_default();
                if status_text.is_empty() {
                    Self::UnknownError(status, message)
                } else {
                    Self::UnknownError(status, format!("{status_text}: {message}"))
                }
            }
        }
    }
}

impl From<GeminiApiError> for GenerationError {
    fn from(err: GeminiApiError) -> Self {
        match err {
            GeminiApiError::InvalidApiKey => Self::InvalidApiKey,
            GeminiApiError::Forbidden(msg) => Self::PermissionDenied(msg),
            GeminiApiError::RateLimitExceeded(msg) => Self::RateLimitExceeded(msg),
            GeminiApiError::NotFound(msg) => Self::ModelNotFound(msg),
            GeminiApiError::InvalidRequest(msg) => Self::ApiError(msg),
            GeminiApiError::NetworkError(e) if e.is_timeout() => Self::Timeout,
            GeminiApiError::NetworkError(e) => Self::NetworkError(e.to_string()),
            GeminiApiError::JsonError(e) => Self::MalformedResponse(e.to_string()),
            GeminiApiError::ServerError(status, msg) => {
                Self::ApiError(format!("Server error ({status}): {msg}"))
            }
            GeminiApiError::UnknownError(status, msg) => {
                Self::ApiError(format!("Unexpected status ({status}): {msg}"))
            }
        }
    }
}
