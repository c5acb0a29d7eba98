// --- File: crates/services/neobrain_backend/src/router.rs ---
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use neobrain_auth::{require_session, AuthState, DomainGate};
use neobrain_autocalendar::AutocalendarState;
use neobrain_common::NeoBrainError;
use neobrain_config::AppConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;

use crate::app_state::AppState;
use crate::chatbot;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

// Lax so the session cookie survives the redirect back from the consent screen.
fn session_layer(config: &AppConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.server.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.auth.session_ttl_minutes,
        )))
}

/// The `/api` routes; everything but health and the login routes sits behind the gate.
pub fn api_router(state: &AppState) -> Result<Router, NeoBrainError> {
    let auth_state = Arc::new(AuthState {
        provider: state.identity_provider.clone(),
        gate: DomainGate::new(&state.config.auth.allowed_email_suffix),
    });
    let autocalendar_state = Arc::new(AutocalendarState::new(
        state.config.clone(),
        state.calendar_connector.clone(),
    )?);

    let protected = neobrain_autocalendar::routes(autocalendar_state)
        .merge(chatbot::routes(state.config.clone()))
        .layer(from_fn_with_state(auth_state.clone(), require_session));

    Ok(Router::new()
        .route("/health", get(health))
        .merge(neobrain_auth::routes(auth_state))
        .merge(protected))
}

/// Full application: API, optional Swagger UI, static pages, sessions and request tracing.
pub fn build_app(state: &AppState) -> Result<Router, NeoBrainError> {
    let mut app = Router::new().nest("/api", api_router(state)?);

    #[cfg(feature = "openapi")]
    {
        use neobrain_auth::doc::AuthApiDoc;
        use neobrain_autocalendar::doc::AutocalendarApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "NeoBrain API",
                version = "0.1.0",
                description = "NeoBrain autocalendar service API docs"
            ),
            paths(crate::chatbot::chatbot_handler),
            components(schemas(crate::chatbot::ChatbotInfo)),
            tags( (name = "Chatbot", description = "Embedded assistant")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(AuthApiDoc::openapi());
        openapi_doc.merge(AutocalendarApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui = SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc);
        app = app.merge(swagger_ui);
    }

    info!("Serving static files from {}", state.config.server.static_dir);
    let app = app
        .fallback_service(ServeDir::new(&state.config.server.static_dir))
        .layer(session_layer(&state.config))
        .layer(TraceLayer::new_for_http());
    Ok(app)
}
