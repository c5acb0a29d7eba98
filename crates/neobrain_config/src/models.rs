// --- File: crates/neobrain_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the static pages (home, autocalendar, chatbot).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Marks the session cookie `Secure`; disable only for plain-http development.
    #[serde(default)]
    pub secure_cookies: bool,
}

fn default_static_dir() -> String {
    "dist".to_string()
}

// --- Google OAuth / Login Config ---
// client_secret is normally "secret_from_env" and injected at load time.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    #[serde(default)]
    pub redirect_url_test: Option<String>,
    /// Use `redirect_url_test` instead of `redirect_url`.
    #[serde(default)]
    pub testing_mode: bool,
    /// Only emails ending with this suffix may log in.
    #[serde(default = "default_allowed_email_suffix")]
    pub allowed_email_suffix: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
    #[serde(default = "default_session_ttl_minutes")]
    pub session_ttl_minutes: i64,
}

impl AuthConfig {
    /// The redirect URI registered with the provider for the current mode.
    pub fn effective_redirect_url(&self) -> &str {
        match (&self.redirect_url_test, self.testing_mode) {
            (Some(test_url), true) => test_url,
            _ => &self.redirect_url,
        }
    }
}

fn default_allowed_email_suffix() -> String {
    "@neo.com.pe".to_string()
}

fn default_scopes() -> Vec<String> {
    vec![
        "openid".to_string(),
        "email".to_string(),
        "https://www.googleapis.com/auth/calendar.events".to_string(),
    ]
}

fn default_session_ttl_minutes() -> i64 {
    8 * 60
}

// --- Google Calendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// IANA zone used to display event dates and times.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            calendar_id: default_calendar_id(),
            time_zone: default_time_zone(),
            page_size: default_page_size(),
        }
    }
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_time_zone() -> String {
    "America/Lima".to_string()
}

fn default_page_size() -> u32 {
    250
}

// --- Autocalendar Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AutocalendarConfig {
    /// Prepended to the last four characters of the event id to suggest a code.
    #[serde(default = "default_suggestion_prefix")]
    pub suggestion_prefix: String,
    #[serde(default = "default_window_days")]
    pub default_days_back: i64,
    #[serde(default = "default_window_days")]
    pub default_days_forward: i64,
    /// Furthest a fetch window may reach from today, in either direction.
    #[serde(default = "default_max_range_days")]
    pub max_range_days: i64,
    /// Also write the code into a private extended property of the event.
    #[serde(default)]
    pub mirror_code_property: bool,
}

impl Default for AutocalendarConfig {
    fn default() -> Self {
        Self {
            suggestion_prefix: default_suggestion_prefix(),
            default_days_back: default_window_days(),
            default_days_forward: default_window_days(),
            max_range_days: default_max_range_days(),
            mirror_code_property: false,
        }
    }
}

fn default_suggestion_prefix() -> String {
    "#1741".to_string()
}

fn default_window_days() -> i64 {
    7
}

fn default_max_range_days() -> i64 {
    365
}

// --- Chatbot Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ChatbotConfig {
    pub embed_url: String,
}

// --- Logging Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    /// Minimum level for the `neobrain` targets (trace, debug, info, warn, error).
    #[serde(default)]
    pub level: Option<String>,
    /// When set, logs are also written to a daily rolling file in this directory.
    #[serde(default)]
    pub directory: Option<String>,
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server and auth config are mandatory
    pub server: ServerConfig,
    pub auth: AuthConfig,

    #[serde(default)]
    pub gcal: GcalConfig,
    #[serde(default)]
    pub autocalendar: AutocalendarConfig,
    #[serde(default)]
    pub logging: LoggingConfig,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub use_chatbot: bool,
    #[serde(default)]
    pub chatbot: Option<ChatbotConfig>,
}
