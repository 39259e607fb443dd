use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by a [`GenerativeClient`](super::GenerativeClient)
///
/// Messages are what ends up in a failed result row, so they are written for
/// the person reading the results table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Invalid API key - authentication failed")]
    InvalidApiKey,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota or rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Errors raised while looking up an API key
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to read secrets file {path}: {message}")]
    SecretStore { path: PathBuf, message: String },

    #[error("Environment variable {0} is not valid unicode")]
    InvalidEnvironment(&'static str),

    #[error("Failed to read API key from terminal: {0}")]
    Interactive(#[from] std::io::Error),
}
