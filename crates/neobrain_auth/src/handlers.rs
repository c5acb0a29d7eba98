// --- File: crates/neobrain_auth/src/handlers.rs ---
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Json, Redirect},
};
use chrono::Utc;
use neobrain_common::logging::log_error;
use neobrain_common::session::{
    clear_identity, read_identity, store_identity, store_oauth_state, take_oauth_state,
};
use neobrain_common::NeoBrainError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;
use tracing::info;
use uuid::Uuid;

use crate::error::AuthError;
use crate::gate::{decide_access, AccessDecision, DomainGate};
use crate::logic::{authenticate, check_state};
use crate::provider::IdentityProvider;
use crate::routes::LOGIN_PATH;

// Shared state for the auth routes and the gate middleware
#[derive(Clone)]
pub struct AuthState {
    pub provider: Arc<dyn IdentityProvider>,
    pub gate: DomainGate,
}

#[cfg_attr(
    feature = "openapi",
    derive(utoipa::IntoParams),
    into_params(parameter_in = Query)
)]
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by the provider when the user denied consent.
    pub error: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionInfo {
    pub authenticated: bool,
    pub email: Option<String>,
    pub login_url: String,
}

/// Starts a login: stores a fresh CSRF state and redirects to the consent screen.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/auth/login",
    responses(
        (status = 303, description = "Redirect to the provider, or home when already logged in")
    ),
    tag = "Auth"
))]
pub async fn login_handler(
    State(state): State<Arc<AuthState>>,
    session: Session,
) -> Result<Redirect, NeoBrainError> {
    let identity = read_identity(&session).await?;
    let decision = decide_access(identity.token, identity.email, &state.gate, Utc::now());
    if let AccessDecision::Granted { .. } = decision {
        return Ok(Redirect::to("/"));
    }

    let csrf_state = Uuid::new_v4().to_string();
    store_oauth_state(&session, &csrf_state).await?;
    Ok(Redirect::to(&state.provider.authorization_url(&csrf_state)))
}

/// Provider callback. Always redirects: home on success, home with `auth_error` otherwise.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/auth/callback",
    params(CallbackQuery),
    responses(
        (status = 303, description = "Redirect to `/` or `/?auth_error=...`")
    ),
    tag = "Auth"
))]
pub async fn callback_handler(
    State(state): State<Arc<AuthState>>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Redirect {
    match complete_login(&state, &session, query).await {
        Ok(email) => {
            info!("session established for {}", email);
            Redirect::to("/")
        }
        Err(err) => {
            log_error(&err, "login failed");
            Redirect::to(&error_redirect(&err.to_string()))
        }
    }
}

async fn complete_login(
    state: &AuthState,
    session: &Session,
    query: CallbackQuery,
) -> Result<String, NeoBrainError> {
    let expected = take_oauth_state(session).await?;
    if let Some(error) = query.error {
        return Err(AuthError::Provider(error).into());
    }
    check_state(expected.as_deref(), query.state.as_deref())?;
    let code = query.code.ok_or(AuthError::MissingCode)?;

    match authenticate(state.provider.as_ref(), &state.gate, &code).await {
        Ok(outcome) => {
            store_identity(session, &outcome.email, &outcome.token).await?;
            Ok(outcome.email)
        }
        Err(err @ AuthError::DomainRejected(_)) => {
            clear_identity(session).await?;
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}

/// `/?auth_error=<message>`, shown inline by the home page.
pub fn error_redirect(message: &str) -> String {
    match serde_urlencoded::to_string([("auth_error", message)]) {
        Ok(query) => format!("/?{}", query),
        Err(_) => "/?auth_error=login%20failed".to_string(),
    }
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current login state", body = SessionInfo)
    ),
    tag = "Auth"
))]
pub async fn session_handler(
    State(state): State<Arc<AuthState>>,
    session: Session,
) -> Result<Json<SessionInfo>, NeoBrainError> {
    let identity = read_identity(&session).await?;
    let info = match decide_access(identity.token, identity.email, &state.gate, Utc::now()) {
        AccessDecision::Granted { email, .. } => SessionInfo {
            authenticated: true,
            email: Some(email),
            login_url: LOGIN_PATH.to_string(),
        },
        _ => SessionInfo {
            authenticated: false,
            email: None,
            login_url: LOGIN_PATH.to_string(),
        },
    };
    Ok(Json(info))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 204, description = "Session destroyed")
    ),
    tag = "Auth"
))]
pub async fn logout_handler(session: Session) -> Result<StatusCode, NeoBrainError> {
    session.flush().await?;
    Ok(StatusCode::NO_CONTENT)
}
