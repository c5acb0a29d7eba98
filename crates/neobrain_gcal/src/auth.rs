// File: crates/neobrain_gcal/src/auth.rs
use google_calendar3::{
    common::GetToken,
    hyper_rustls::{self, HttpsConnectorBuilder},
    hyper_util::client::legacy::connect::HttpConnector,
    hyper_util::client::legacy::Client,
    CalendarHub,
};
use neobrain_common::services::{CalendarConnector, CalendarService};
use neobrain_common::{NeoBrainError, OAuthToken};
use std::error::Error;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::debug;

use crate::logic::GcalError;
use crate::service::GoogleCalendarService;

/// Token endpoint used to refresh user credentials.
pub const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

// Type aliases for clarity
pub type Connector = hyper_rustls::HttpsConnector<HttpConnector>;

pub type HubType = CalendarHub<Connector>;

/// User credentials for the Calendar API, built from the session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub token_uri: String,
    pub scopes: Vec<String>,
}

/// Maps an OAuth token into Calendar API credentials. No network call is made.
///
/// Fails with `MissingTokenField` when the access token or the scope list is absent or empty.
pub fn build_credentials(token: &OAuthToken) -> Result<Credentials, GcalError> {
    let access_token = token
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GcalError::MissingTokenField("access_token".to_string()))?;

    let scopes = token.scopes();
    if scopes.is_empty() {
        return Err(GcalError::MissingTokenField("scope".to_string()));
    }

    Ok(Credentials {
        access_token: access_token.to_string(),
        refresh_token: token.refresh_token.clone(),
        token_uri: TOKEN_URI.to_string(),
        scopes,
    })
}

impl GetToken for Credentials {
    fn get_token<'a>(
        &'a self,
        _scopes: &'a [&str],
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>, Box<dyn Error + Send + Sync>>> + Send + 'a>>
    {
        Box::pin(async move { Ok(Some(self.access_token.clone())) })
    }
}

/// Builds the HTTPS connector shared by all calendar hubs.
pub fn create_https_connector() -> Result<Connector, GcalError> {
    let https = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(|e| GcalError::Connector(e.to_string()))?
        .https_or_http()
        .enable_http1()
        .build();
    Ok(https)
}

/// Creates a hub acting with the given user credentials.
pub fn create_calendar_hub(connector: Connector, credentials: Credentials) -> HubType {
    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);
    CalendarHub::new(client, credentials)
}

/// Connects session tokens to Google Calendar services.
#[derive(Clone)]
pub struct GoogleCalendarConnector {
    connector: Connector,
}

impl GoogleCalendarConnector {
    pub fn new() -> Result<Self, GcalError> {
        Ok(Self {
            connector: create_https_connector()?,
        })
    }
}

impl CalendarConnector for GoogleCalendarConnector {
    fn connect(&self, token: &OAuthToken) -> Result<Arc<dyn CalendarService>, NeoBrainError> {
        let credentials = build_credentials(token)?;
        debug!("building calendar hub with scopes {:?}", credentials.scopes);
        let hub = create_calendar_hub(self.connector.clone(), credentials);
        Ok(Arc::new(GoogleCalendarService::new(Arc::new(hub))))
    }
}
