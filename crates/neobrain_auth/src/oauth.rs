// --- File: crates/neobrain_auth/src/oauth.rs ---
//! Authorization-code flow against Google's OAuth endpoints.

use chrono::Utc;
use neobrain_common::OAuthToken;
use neobrain_config::AuthConfig;
use reqwest::Client;
use tracing::{info, warn};

use crate::error::AuthError;

pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Clone)]
pub struct GoogleOAuthClient {
    client_id: String,
    client_secret: String,
    redirect_url: String,
    scopes: Vec<String>,
    auth_endpoint: String,
    token_endpoint: String,
    http: Client,
}

impl GoogleOAuthClient {
    pub fn from_config(config: &AuthConfig, http: Client) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.effective_redirect_url().to_string(),
            scopes: config.scopes.clone(),
            auth_endpoint: GOOGLE_AUTH_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
            http,
        }
    }

    /// Points the client at other endpoints (local test servers).
    pub fn with_endpoints(
        mut self,
        auth_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        self.auth_endpoint = auth_endpoint.into();
        self.token_endpoint = token_endpoint.into();
        self
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The consent-screen URL; `state` is echoed back to the callback.
    pub fn authorization_url(&self, state: &str) -> String {
        let scope = self.scopes.join(" ");
        let query = serde_urlencoded::to_string([
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("response_type", "code"),
            ("scope", scope.as_str()),
            ("access_type", "offline"),
            ("state", state),
        ])
        .unwrap_or_default();
        format!("{}?{}", self.auth_endpoint, query)
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// A non-success response becomes `TokenExchange` carrying the provider's raw body.
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken, AuthError> {
        let params = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AuthError::TokenExchange(e.to_string()))?;

        if !status.is_success() {
            warn!("token exchange failed with {}: {}", status, body);
            return Err(AuthError::TokenExchange(body));
        }

        let token: OAuthToken = serde_json::from_str(&body)
            .map_err(|e| AuthError::TokenExchange(format!("unreadable token response: {}", e)))?;
        info!("token exchange succeeded (scopes: {})", token.scope.as_deref().unwrap_or(""));
        Ok(token.stamp_expiry(Utc::now()))
    }
}
