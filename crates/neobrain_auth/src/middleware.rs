// --- File: crates/neobrain_auth/src/middleware.rs ---
use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use neobrain_common::session::{clear_identity, read_identity};
use neobrain_common::{AuthenticatedUser, NeoBrainError};
use serde_json::json;
use std::sync::Arc;
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::gate::{decide_access, AccessDecision};
use crate::handlers::AuthState;
use crate::routes::LOGIN_PATH;

/// Gate for every protected route.
///
/// Without a session identity the request is answered with 401 and the login URL.
/// A wrong-domain identity is cleared from the session and answered with 403.
/// Otherwise the `AuthenticatedUser` is placed in the request extensions.
pub async fn require_session(
    State(state): State<Arc<AuthState>>,
    session: Session,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match read_identity(&session).await {
        Ok(identity) => identity,
        Err(err) => return err.into_response(),
    };

    match decide_access(identity.token, identity.email, &state.gate, Utc::now()) {
        AccessDecision::LoginRequired => {
            debug!("no usable session identity for {}", req.uri().path());
            login_required_response()
        }
        AccessDecision::Rejected { email } => {
            warn!("clearing session of out-of-domain user {}", email);
            if let Err(err) = clear_identity(&session).await {
                return err.into_response();
            }
            NeoBrainError::AuthDomainRejected(email).into_response()
        }
        AccessDecision::Granted { email, token } => {
            req.extensions_mut()
                .insert(AuthenticatedUser { email, token });
            next.run(req).await
        }
    }
}

/// 401 body in the common error shape, plus where to log in.
pub fn login_required_response() -> Response {
    let err = NeoBrainError::LoginRequired;
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": {
                "message": err.to_string(),
                "code": 401,
            },
            "login_url": LOGIN_PATH,
        })),
    )
        .into_response()
}
