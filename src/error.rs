//! Error types for the authsession CLI

use thiserror::Error;

use crate::session::EndReason;

/// Result type alias for authsession operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Prompt(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

/// Authentication API errors.
///
/// Rejections carry the server's `detail` message so login and registration
/// failures can be shown to the user as-is.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Authentication rejected: {0}")]
    Unauthorized(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// A success status whose body could not be decoded
    #[error("Unreadable API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Network("Request timed out".to_string())
        } else if err.is_connect() {
            ApiError::Network("Failed to connect to API".to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),

    #[error("Could not determine home directory")]
    NoHome,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Local session state errors
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Stored user profile is corrupted: {0}")]
    CorruptProfile(String),

    #[error("Not logged in")]
    NoSession,

    #[error("Already logged in as {0}. Run `authsession logout` first.")]
    AlreadyAuthenticated(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Session ended: {0}")]
    Ended(EndReason),
}
