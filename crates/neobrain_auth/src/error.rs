// --- File: crates/neobrain_auth/src/error.rs ---
use neobrain_common::NeoBrainError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization code missing from callback")]
    MissingCode,
    #[error("login state mismatch; start the login again")]
    StateMismatch,
    #[error("provider returned an error: {0}")]
    Provider(String),
    #[error("{0}")]
    TokenExchange(String),
    #[error("token response carries no id_token")]
    MissingIdToken,
    #[error("{0}")]
    InvalidIdToken(String),
    #[error("could not load signing keys: {0}")]
    Jwks(String),
    #[error("ID token carries no email claim")]
    EmailMissing,
    #[error("email {0} is not verified")]
    EmailUnverified(String),
    #[error("{0}")]
    DomainRejected(String),
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::InvalidIdToken(err.to_string())
    }
}

impl From<AuthError> for NeoBrainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCode | AuthError::StateMismatch | AuthError::Provider(_) => {
                NeoBrainError::ValidationError(err.to_string())
            }
            AuthError::TokenExchange(raw) => NeoBrainError::TokenExchangeFailed(raw),
            AuthError::MissingIdToken
            | AuthError::InvalidIdToken(_)
            | AuthError::Jwks(_)
            | AuthError::EmailMissing
            | AuthError::EmailUnverified(_) => NeoBrainError::IdTokenInvalid(err.to_string()),
            AuthError::DomainRejected(email) => NeoBrainError::AuthDomainRejected(email),
        }
    }
}
