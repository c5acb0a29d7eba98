// File: crates/neobrain_auth/src/doc.rs
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers::SessionInfo;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::login_handler,
        crate::handlers::callback_handler,
        crate::handlers::session_handler,
        crate::handlers::logout_handler,
    ),
    components(schemas(SessionInfo)),
    tags(
        (name = "Auth", description = "Google login restricted to the company domain")
    )
)]
pub struct AuthApiDoc;
