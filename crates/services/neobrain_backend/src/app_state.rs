// --- File: crates/services/neobrain_backend/src/app_state.rs ---
use neobrain_auth::oauth::GoogleOAuthClient;
use neobrain_auth::verify::IdTokenVerifier;
use neobrain_auth::{GoogleIdentityProvider, IdentityProvider};
use neobrain_common::services::CalendarConnector;
use neobrain_common::{config_error, NeoBrainError, HTTP_CLIENT};
use neobrain_config::AppConfig;
use neobrain_gcal::GoogleCalendarConnector;
use std::sync::Arc;

/// Application state shared by every router.
///
/// The identity provider and calendar connector are trait objects so tests can
/// wire the same router against local stand-ins.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub calendar_connector: Arc<dyn CalendarConnector>,
}

/// Builder for AppState.
pub struct AppStateBuilder {
    config: Arc<AppConfig>,
    identity_provider: Option<Arc<dyn IdentityProvider>>,
    calendar_connector: Option<Arc<dyn CalendarConnector>>,
}

impl AppStateBuilder {
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            config,
            identity_provider: None,
            calendar_connector: None,
        }
    }

    pub fn with_identity_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.identity_provider = Some(provider);
        self
    }

    pub fn with_calendar_connector(mut self, connector: Arc<dyn CalendarConnector>) -> Self {
        self.calendar_connector = Some(connector);
        self
    }

    pub fn build(self) -> Result<AppState, NeoBrainError> {
        Ok(AppState {
            config: self.config,
            identity_provider: self
                .identity_provider
                .ok_or_else(|| config_error("identity provider must be set"))?,
            calendar_connector: self
                .calendar_connector
                .ok_or_else(|| config_error("calendar connector must be set"))?,
        })
    }
}

impl AppState {
    pub fn builder(config: Arc<AppConfig>) -> AppStateBuilder {
        AppStateBuilder::new(config)
    }

    /// Wires Google login and Google Calendar from the loaded configuration.
    pub fn new(config: Arc<AppConfig>) -> Result<Self, NeoBrainError> {
        let http = HTTP_CLIENT.clone();
        let oauth = GoogleOAuthClient::from_config(&config.auth, http.clone());
        let verifier = IdTokenVerifier::google(config.auth.client_id.clone(), http);
        let connector = GoogleCalendarConnector::new()?;

        Self::builder(config)
            .with_identity_provider(Arc::new(GoogleIdentityProvider::new(oauth, verifier)))
            .with_calendar_connector(Arc::new(connector))
            .build()
    }
}
