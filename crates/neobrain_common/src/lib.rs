// --- File: crates/neobrain_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error handling
pub mod http; // HTTP utilities
pub mod logging; // Logging utilities
pub mod models; // Shared data structures
pub mod services; // Service abstractions
pub mod session; // Session keys and identity

#[cfg(test)]
mod error_test;

// Re-export error types and utilities for easier access
pub use error::{
    config_error, remote_api_error, validation_error, HttpStatusCode, NeoBrainError,
};

// Re-export HTTP utilities for easier access
pub use http::{client::HTTP_CLIENT, IntoHttpResponse};

pub use models::OAuthToken;
pub use session::AuthenticatedUser;
