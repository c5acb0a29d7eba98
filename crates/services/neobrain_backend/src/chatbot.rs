// --- File: crates/services/neobrain_backend/src/chatbot.rs ---
use axum::{extract::State, response::Json, routing::get, Router};
use neobrain_common::AuthenticatedUser;
use neobrain_config::AppConfig;
use serde::Serialize;
use std::sync::Arc;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct ChatbotInfo {
    pub enabled: bool,
    pub embed_url: Option<String>,
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/chatbot",
    responses(
        (status = 200, description = "Chatbot embed settings", body = ChatbotInfo),
        (status = 401, description = "Login required")
    ),
    tag = "Chatbot"
))]
pub async fn chatbot_handler(
    State(config): State<Arc<AppConfig>>,
    _user: AuthenticatedUser,
) -> Json<ChatbotInfo> {
    let embed_url = config
        .chatbot
        .as_ref()
        .filter(|_| config.use_chatbot)
        .map(|c| c.embed_url.clone());
    Json(ChatbotInfo {
        enabled: embed_url.is_some(),
        embed_url,
    })
}

pub fn routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/chatbot", get(chatbot_handler))
        .with_state(config)
}
