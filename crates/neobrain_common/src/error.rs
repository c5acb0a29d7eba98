// --- File: crates/neobrain_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

use crate::services::BoxedError;

/// The base error type for all NeoBrain errors.
///
/// Crate-local error enums extend this by implementing `From<LocalError> for NeoBrainError`.
#[derive(Error, Debug)]
pub enum NeoBrainError {
    /// No identity in the session
    #[error("Login required")]
    LoginRequired,

    /// The authenticated email is outside the allowed domain
    #[error("Access restricted to the allowed domain; {0} is not permitted")]
    AuthDomainRejected(String),

    /// The OAuth code exchange failed; carries the provider's raw error text
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// The ID token is missing or could not be verified
    #[error("Invalid ID token: {0}")]
    IdTokenInvalid(String),

    /// Any failure reported by the remote calendar API
    #[error("Calendar API error: {0}")]
    RemoteApiError(#[source] BoxedError),

    /// The stored token lacks a field needed to build credentials
    #[error("OAuth token is missing field: {0}")]
    MissingTokenField(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The session store failed
    #[error("Session error: {0}")]
    SessionError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for NeoBrainError {
    fn status_code(&self) -> u16 {
        match self {
            NeoBrainError::LoginRequired => 401,
            NeoBrainError::AuthDomainRejected(_) => 403,
            NeoBrainError::TokenExchangeFailed(_) => 502,
            NeoBrainError::IdTokenInvalid(_) => 401,
            NeoBrainError::RemoteApiError(_) => 502,
            NeoBrainError::MissingTokenField(_) => 401,
            NeoBrainError::ValidationError(_) => 400,
            NeoBrainError::ConfigError(_) => 500,
            NeoBrainError::SessionError(_) => 500,
            NeoBrainError::ParseError(_) => 400,
            NeoBrainError::InternalError(_) => 500,
        }
    }
}

// Common error conversions
impl From<serde_json::Error> for NeoBrainError {
    fn from(err: serde_json::Error) -> Self {
        NeoBrainError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for NeoBrainError {
    fn from(err: std::io::Error) -> Self {
        NeoBrainError::InternalError(err.to_string())
    }
}

impl From<tower_sessions::session::Error> for NeoBrainError {
    fn from(err: tower_sessions::session::Error) -> Self {
        NeoBrainError::SessionError(err.to_string())
    }
}

impl From<neobrain_config::ConfigError> for NeoBrainError {
    fn from(err: neobrain_config::ConfigError) -> Self {
        NeoBrainError::ConfigError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> NeoBrainError {
    NeoBrainError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> NeoBrainError {
    NeoBrainError::ValidationError(message.to_string())
}

pub fn remote_api_error<E>(err: E) -> NeoBrainError
where
    E: std::error::Error + Send + Sync + 'static,
{
    NeoBrainError::RemoteApiError(BoxedError(Box::new(err)))
}

