// --- File: crates/neobrain_auth/src/provider.rs ---
use async_trait::async_trait;
use neobrain_common::OAuthToken;

use crate::error::AuthError;
use crate::oauth::GoogleOAuthClient;
use crate::verify::{IdClaims, IdTokenVerifier};

/// The OAuth provider as seen by the login flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// URL of the consent screen for a login carrying `state`.
    fn authorization_url(&self, state: &str) -> String;

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, AuthError>;

    /// Verifies the ID token signature and returns its claims.
    async fn verify_id_token(&self, id_token: &str) -> Result<IdClaims, AuthError>;
}

pub struct GoogleIdentityProvider {
    oauth: GoogleOAuthClient,
    verifier: IdTokenVerifier,
}

impl GoogleIdentityProvider {
    pub fn new(oauth: GoogleOAuthClient, verifier: IdTokenVerifier) -> Self {
        Self { oauth, verifier }
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    fn authorization_url(&self, state: &str) -> String {
        self.oauth.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<OAuthToken, AuthError> {
        self.oauth.exchange_code(code).await
    }

    async fn verify_id_token(&self, id_token: &str) -> Result<IdClaims, AuthError> {
        self.verifier.verify(id_token).await
    }
}
