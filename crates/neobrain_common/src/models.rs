// --- File: crates/neobrain_common/src/models.rs ---

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The token-endpoint response as kept in the session.
///
/// Every field is optional so that a partially populated token can be stored
/// and the missing parts reported when credentials are built from it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OAuthToken {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Absolute expiry, computed from `expires_in` when the token is received.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Fills `expires_at` from `expires_in`, relative to `now`.
    pub fn stamp_expiry(mut self, now: DateTime<Utc>) -> Self {
        if let Some(secs) = self.expires_in {
            self.expires_at = Some(now + Duration::seconds(secs));
        }
        self
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }

    /// The granted scopes, split on whitespace.
    pub fn scopes(&self) -> Vec<String> {
        self.scope
            .as_deref()
            .map(|s| s.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
