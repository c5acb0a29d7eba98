// --- File: crates/neobrain_auth/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{
    callback_handler, login_handler, logout_handler, session_handler, AuthState,
};

/// Where the browser goes to start a login.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Login, callback, session and logout routes (mounted under `/api`).
///
/// They need a `SessionManagerLayer` somewhere above them.
pub fn routes(state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/auth/login", get(login_handler))
        .route("/auth/callback", get(callback_handler))
        .route("/auth/session", get(session_handler))
        .route("/auth/logout", post(logout_handler))
        .with_state(state)
}
