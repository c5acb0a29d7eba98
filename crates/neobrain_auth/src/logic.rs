// --- File: crates/neobrain_auth/src/logic.rs ---
use neobrain_common::OAuthToken;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::gate::DomainGate;
use crate::provider::IdentityProvider;

/// A login that passed verification and the domain gate.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub email: String,
    pub token: OAuthToken,
}

/// Checks the callback state against the one stored when the login started.
pub fn check_state(expected: Option<&str>, received: Option<&str>) -> Result<(), AuthError> {
    match (expected, received) {
        (Some(expected), Some(received)) if !expected.is_empty() && expected == received => Ok(()),
        _ => Err(AuthError::StateMismatch),
    }
}

/// Exchanges `code`, verifies the ID token and applies the domain gate.
pub async fn authenticate(
    provider: &dyn IdentityProvider,
    gate: &DomainGate,
    code: &str,
) -> Result<LoginOutcome, AuthError> {
    if code.trim().is_empty() {
        return Err(AuthError::MissingCode);
    }

    let token = provider.exchange_code(code).await?;
    let id_token = token
        .id_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingIdToken)?;

    let claims = provider.verify_id_token(id_token).await?;
    let email = claims.verified_email()?.to_string();

    if !gate.accepts(&email) {
        warn!("login rejected for {} (allowed suffix {})", email, gate.suffix());
        return Err(AuthError::DomainRejected(email));
    }

    info!("login accepted for {}", email);
    Ok(LoginOutcome { email, token })
}
