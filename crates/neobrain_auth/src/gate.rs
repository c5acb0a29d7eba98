// --- File: crates/neobrain_auth/src/gate.rs ---
//! The access decision made for every protected request.

use chrono::{DateTime, Utc};
use neobrain_common::OAuthToken;

/// Accepts emails that end with one configured suffix, e.g. `@neo.com.pe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainGate {
    suffix: String,
}

impl DomainGate {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Case-sensitive suffix match on the whole address.
    pub fn accepts(&self, email: &str) -> bool {
        !self.suffix.is_empty() && email.ends_with(&self.suffix)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// Nothing usable in the session, or the access token has expired; show the login prompt.
    LoginRequired,
    /// An identity is present but outside the domain; the session identity must be cleared.
    Rejected { email: String },
    Granted { email: String, token: OAuthToken },
}

/// Decides access from what the session holds at `now`. Pure; the caller applies side effects.
pub fn decide_access(
    token: Option<OAuthToken>,
    email: Option<String>,
    gate: &DomainGate,
    now: DateTime<Utc>,
) -> AccessDecision {
    match (token, email) {
        (Some(token), Some(email)) if gate.accepts(&email) => {
            if token.is_expired(now) {
                AccessDecision::LoginRequired
            } else {
                AccessDecision::Granted { email, token }
            }
        }
        (Some(_), Some(email)) => AccessDecision::Rejected { email },
        // An email without a token, or a wrong-domain email left behind, still gets cleared.
        (None, Some(email)) if !gate.accepts(&email) => AccessDecision::Rejected { email },
        _ => AccessDecision::LoginRequired,
    }
}
