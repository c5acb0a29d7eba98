// --- File: crates/neobrain_common/src/session.rs ---
//! Session keys and the authenticated-identity extractor.
//!
//! The session holds the OAuth token and the verified email once login has
//! succeeded, and the CSRF state while a login is in flight.

use axum::{extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::debug;

use crate::error::NeoBrainError;
use crate::models::OAuthToken;

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "email";
pub const OAUTH_STATE_KEY: &str = "oauth_state";

/// Identity of a request that passed the domain gate.
///
/// Inserted into request extensions by the auth middleware; handlers behind
/// the gate take it as an extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,
    pub token: OAuthToken,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = NeoBrainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(NeoBrainError::LoginRequired)
    }
}

/// What the session currently claims about the user, before any gate decision.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    pub token: Option<OAuthToken>,
    pub email: Option<String>,
}

pub async fn read_identity(session: &Session) -> Result<SessionIdentity, NeoBrainError> {
    let token = session.get::<OAuthToken>(TOKEN_KEY).await?;
    let email = session.get::<String>(EMAIL_KEY).await?;
    Ok(SessionIdentity { token, email })
}

/// Stores a freshly verified identity under a new session id.
pub async fn store_identity(
    session: &Session,
    email: &str,
    token: &OAuthToken,
) -> Result<(), NeoBrainError> {
    session.cycle_id().await?;
    session.insert(TOKEN_KEY, token).await?;
    session.insert(EMAIL_KEY, email).await?;
    debug!("stored session identity for {}", email);
    Ok(())
}

/// Removes token and email; the session itself stays usable for a new login.
pub async fn clear_identity(session: &Session) -> Result<(), NeoBrainError> {
    session.remove_value(TOKEN_KEY).await?;
    session.remove_value(EMAIL_KEY).await?;
    Ok(())
}

pub async fn store_oauth_state(session: &Session, state: &str) -> Result<(), NeoBrainError> {
    session.insert(OAUTH_STATE_KEY, state).await?;
    Ok(())
}

/// Returns and removes the pending CSRF state, so each state is usable once.
pub async fn take_oauth_state(session: &Session) -> Result<Option<String>, NeoBrainError> {
    Ok(session.remove::<String>(OAUTH_STATE_KEY).await?)
}
