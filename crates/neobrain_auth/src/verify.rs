// --- File: crates/neobrain_auth/src/verify.rs ---
//! ID-token verification against the provider's published signing keys.

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AuthError;

pub const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
pub const GOOGLE_ISSUERS: [&str; 2] = ["accounts.google.com", "https://accounts.google.com"];

const JWKS_TTL: Duration = Duration::from_secs(60 * 60);

/// Claims read from a verified ID token.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IdClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: Option<bool>,
    pub exp: i64,
}

impl IdClaims {
    /// The email to gate on; an explicit `email_verified: false` is refused.
    pub fn verified_email(&self) -> Result<&str, AuthError> {
        let email = self.email.as_deref().ok_or(AuthError::EmailMissing)?;
        if self.email_verified == Some(false) {
            return Err(AuthError::EmailUnverified(email.to_string()));
        }
        Ok(email)
    }
}

struct CachedKeys {
    keys: JwkSet,
    fetched_at: Instant,
}

enum KeySource {
    Remote { url: String, http: Client },
    Static,
}

/// Verifies RS256 ID tokens; keys are cached for an hour and refetched on an unknown `kid`.
pub struct IdTokenVerifier {
    audience: String,
    issuers: Vec<String>,
    source: KeySource,
    cache: RwLock<Option<CachedKeys>>,
}

impl IdTokenVerifier {
    pub fn google(client_id: impl Into<String>, http: Client) -> Self {
        Self::remote(client_id, GOOGLE_JWKS_URL, http)
    }

    pub fn remote(client_id: impl Into<String>, jwks_url: impl Into<String>, http: Client) -> Self {
        Self {
            audience: client_id.into(),
            issuers: GOOGLE_ISSUERS.iter().map(|s| s.to_string()).collect(),
            source: KeySource::Remote {
                url: jwks_url.into(),
                http,
            },
            cache: RwLock::new(None),
        }
    }

    /// Uses a fixed key set that never expires.
    pub fn with_static_keys(client_id: impl Into<String>, keys: JwkSet) -> Self {
        Self {
            audience: client_id.into(),
            issuers: GOOGLE_ISSUERS.iter().map(|s| s.to_string()).collect(),
            source: KeySource::Static,
            cache: RwLock::new(Some(CachedKeys {
                keys,
                fetched_at: Instant::now(),
            })),
        }
    }

    pub async fn verify(&self, id_token: &str) -> Result<IdClaims, AuthError> {
        let header = decode_header(id_token)?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::InvalidIdToken("token header has no kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_issuer(&self.issuers);

        let data = decode::<IdClaims>(id_token, &key, &validation)?;
        debug!("verified ID token for subject {}", data.claims.sub);
        Ok(data.claims)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(key) = self.cached_key(kid, true).await? {
            return Ok(key);
        }
        if self.refresh().await? {
            if let Some(key) = self.cached_key(kid, false).await? {
                return Ok(key);
            }
        }
        Err(AuthError::InvalidIdToken(format!("unknown signing key {}", kid)))
    }

    /// Looks `kid` up in the cache; with `fresh_only`, expired keys are ignored.
    async fn cached_key(&self, kid: &str, fresh_only: bool) -> Result<Option<DecodingKey>, AuthError> {
        let cache = self.cache.read().await;
        let Some(cached) = cache.as_ref() else {
            return Ok(None);
        };
        let stale = matches!(self.source, KeySource::Remote { .. })
            && cached.fetched_at.elapsed() > JWKS_TTL;
        if fresh_only && stale {
            return Ok(None);
        }
        match cached.keys.find(kid) {
            Some(jwk) => Ok(Some(DecodingKey::from_jwk(jwk)?)),
            None => Ok(None),
        }
    }

    /// Refetches the key set; returns false when the source is static.
    async fn refresh(&self) -> Result<bool, AuthError> {
        let KeySource::Remote { url, http } = &self.source else {
            return Ok(false);
        };
        let response = http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::Jwks(e.to_string()))?;
        let keys: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::Jwks(e.to_string()))?;
        info!("fetched {} signing keys from {}", keys.keys.len(), url);

        let mut cache = self.cache.write().await;
        *cache = Some(CachedKeys {
            keys,
            fetched_at: Instant::now(),
        });
        Ok(true)
    }
}
