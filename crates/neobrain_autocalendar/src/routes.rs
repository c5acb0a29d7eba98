// --- File: crates/neobrain_autocalendar/src/routes.rs ---
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::{batch_handler, confirm_handler, list_events_handler, AutocalendarState};

/// Autocalendar routes (mounted under `/api`).
///
/// Every handler extracts `AuthenticatedUser`, so the router must sit behind the session gate.
pub fn routes(state: Arc<AutocalendarState>) -> Router {
    Router::new()
        .route("/autocalendar/events", get(list_events_handler))
        .route("/autocalendar/confirm", post(confirm_handler))
        .route("/autocalendar/batch", post(batch_handler))
        .with_state(state)
}
