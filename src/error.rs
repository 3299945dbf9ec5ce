//! Error types and handling.

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Email/password rejected by the identity service
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signed-in account lacks the admin role claim
    #[error("Account does not have admin access")]
    NotAdmin,

    /// Any other identity service failure
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Refresh token rejected, user must sign in again
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// Database rules rejected the request
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Database answered with an error status
    #[error("Database error ({status}): {message}")]
    Database { status: u16, message: String },

    /// Event stream broke or carried garbage
    #[error("Stream error: {0}")]
    Stream(String),

    /// Data parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Illegal database key
    #[error("Invalid key '{0}'")]
    InvalidKey(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a parse error with message
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a stream error with message
    pub fn stream(msg: impl Into<String>) -> Self {
        Self::Stream(msg.into())
    }

    /// Whether the user has to sign in again to recover.
    pub fn requires_sign_in(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::NotAdmin)
    }
}
