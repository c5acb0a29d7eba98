// Full login round trip against a local stand-in for Google's token and JWKS endpoints.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use neobrain_auth::oauth::GoogleOAuthClient;
use neobrain_auth::verify::IdTokenVerifier;
use neobrain_auth::{require_session, AuthState, DomainGate, GoogleIdentityProvider};
use neobrain_common::AuthenticatedUser;
use neobrain_config::AuthConfig;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

const PRIVATE_KEY: &str = include_str!("fixtures/test_rsa_key.pem");
const JWKS: &str = include_str!("fixtures/jwks.json");
const CLIENT_ID: &str = "cid.apps.googleusercontent.com";

fn id_token_for(email: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some("test-key-1".to_string());
    let claims = json!({
        "sub": format!("sub-{}", email),
        "email": email,
        "email_verified": true,
        "aud": CLIENT_ID,
        "iss": "https://accounts.google.com",
        "iat": Utc::now().timestamp(),
        "exp": Utc::now().timestamp() + 3600,
    });
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY.as_bytes()).unwrap();
    encode(&header, &claims, &key).unwrap()
}

async fn token_endpoint(Form(form): Form<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    let email = match form.get("code").map(String::as_str) {
        Some("good") => "ana@neo.com.pe",
        Some("outsider") => "bob@gmail.com",
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "invalid_grant", "error_description": "Bad Request"})),
            )
        }
    };
    (
        StatusCode::OK,
        Json(json!({
            "access_token": "ya29.test",
            "refresh_token": "1//refresh",
            "expires_in": 3599,
            "scope": "openid email https://www.googleapis.com/auth/calendar.events",
            "token_type": "Bearer",
            "id_token": id_token_for(email),
        })),
    )
}

/// Serves `/token` and `/certs` on a random local port and returns its base URL.
async fn spawn_fake_google() -> String {
    let app = Router::new()
        .route("/token", post(token_endpoint))
        .route(
            "/certs",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], JWKS) }),
        );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn auth_config() -> AuthConfig {
    AuthConfig {
        client_id: CLIENT_ID.into(),
        client_secret: "shh".into(),
        redirect_url: "http://localhost/api/auth/callback".into(),
        redirect_url_test: None,
        testing_mode: false,
        allowed_email_suffix: "@neo.com.pe".into(),
        scopes: vec!["openid".into(), "email".into()],
        session_ttl_minutes: 60,
    }
}

async fn app() -> Router {
    let base = spawn_fake_google().await;
    let http = reqwest::Client::new();
    let oauth = GoogleOAuthClient::from_config(&auth_config(), http.clone())
        .with_endpoints(format!("{}/auth", base), format!("{}/token", base));
    let verifier = IdTokenVerifier::remote(CLIENT_ID, format!("{}/certs", base), http);
    let state = Arc::new(AuthState {
        provider: Arc::new(GoogleIdentityProvider::new(oauth, verifier)),
        gate: DomainGate::new("@neo.com.pe"),
    });

    let protected = Router::new()
        .route(
            "/whoami",
            get(|user: AuthenticatedUser| async move { user.email }),
        )
        .layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .nest("/api", neobrain_auth::routes(state).merge(protected))
        .layer(SessionManagerLayer::new(MemoryStore::default()).with_secure(false))
}

fn cookie_of(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

fn location_of(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn get_with_cookie(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Runs login up to the consent redirect; returns the session cookie and the issued state.
async fn start_login(app: &Router) -> (String, String) {
    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/auth/login", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = cookie_of(&response).expect("session cookie");
    let location = location_of(&response);
    let query = location.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let params: HashMap<String, String> = serde_urlencoded::from_str(query).unwrap();
    (cookie, params["state"].clone())
}

#[tokio::test]
async fn test_protected_route_without_session_asks_for_login() {
    let app = app().await;
    let response = app
        .oneshot(get_with_cookie("/api/whoami", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["login_url"], "/api/auth/login");
    assert_eq!(body["error"]["code"], 401);
}

#[tokio::test]
async fn test_domain_user_logs_in_and_reaches_protected_route() {
    let app = app().await;
    let (cookie, state) = start_login(&app).await;

    let callback = format!("/api/auth/callback?code=good&state={}", state);
    let response = app
        .clone()
        .oneshot(get_with_cookie(&callback, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location_of(&response), "/");
    // The session id is cycled on login.
    let cookie = cookie_of(&response).unwrap_or(cookie);

    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/whoami", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], b"ana@neo.com.pe");

    let response = app
        .clone()
        .oneshot(get_with_cookie("/api/auth/session", Some(&cookie)))
        .await
        .unwrap();
    let info: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(info["authenticated"], true);
    assert_eq!(info["email"], "ana@neo.com.pe");
}

#[tokio::test]
async fn test_outsider_is_rejected_and_not_logged_in() {
    let app = app().await;
    let (cookie, state) = start_login(&app).await;

    let callback = format!("/api/auth/callback?code=outsider&state={}", state);
    let response = app
        .clone()
        .oneshot(get_with_cookie(&callback, Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = location_of(&response);
    assert!(location.starts_with("/?auth_error="));
    assert!(location.contains("bob%40gmail.com"));

    let response = app
        .oneshot(get_with_cookie("/api/whoami", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_state_mismatch_is_refused() {
    let app = app().await;
    let (cookie, _state) = start_login(&app).await;

    let response = app
        .clone()
        .oneshot(get_with_cookie(
            "/api/auth/callback?code=good&state=forged",
            Some(&cookie),
        ))
        .await
        .unwrap();
    assert!(location_of(&response).starts_with("/?auth_error="));

    let response = app
        .oneshot(get_with_cookie("/api/whoami", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_exchange_error_text_reaches_the_page() {
    let app = app().await;
    let (cookie, state) = start_login(&app).await;

    let callback = format!("/api/auth/callback?code=expired&state={}", state);
    let response = app
        .oneshot(get_with_cookie(&callback, Some(&cookie)))
        .await
        .unwrap();
    assert!(location_of(&response).contains("invalid_grant"));
}

#[tokio::test]
async fn test_logout_ends_the_session() {
    let app = app().await;
    let (cookie, state) = start_login(&app).await;
    let callback = format!("/api/auth/callback?code=good&state={}", state);
    let response = app
        .clone()
        .oneshot(get_with_cookie(&callback, Some(&cookie)))
        .await
        .unwrap();
    let cookie = cookie_of(&response).unwrap_or(cookie);

    let logout = Request::builder()
        .method("POST")
        .uri("/api/auth/logout")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(get_with_cookie("/api/whoami", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
