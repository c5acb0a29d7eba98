use crate::error::*;
use crate::http::IntoHttpResponse;
use axum::body::to_bytes;
use axum::http::StatusCode;
use std::error::Error as _;

#[derive(Debug, thiserror::Error)]
#[error("quota exceeded")]
struct QuotaError;

#[test]
fn test_status_codes() {
    assert_eq!(NeoBrainError::LoginRequired.status_code(), 401);
    assert_eq!(
        NeoBrainError::AuthDomainRejected("a@other.com".into()).status_code(),
        403
    );
    assert_eq!(
        NeoBrainError::TokenExchangeFailed("invalid_grant".into()).status_code(),
        502
    );
    assert_eq!(remote_api_error(QuotaError).status_code(), 502);
    assert_eq!(
        NeoBrainError::MissingTokenField("scope".into()).status_code(),
        401
    );
    assert_eq!(validation_error("enter a code").status_code(), 400);
    assert_eq!(config_error("nope").status_code(), 500);
}

#[test]
fn test_remote_api_error_keeps_source() {
    let err = remote_api_error(QuotaError);
    assert_eq!(err.to_string(), "Calendar API error: quota exceeded");
    assert!(err.source().is_some());
}

#[test]
fn test_io_error_converts_to_internal() {
    let err: NeoBrainError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
    assert!(matches!(err, NeoBrainError::InternalError(ref m) if m == "disk"));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn test_into_http_response_body() {
    let response = NeoBrainError::AuthDomainRejected("a@other.com".into()).into_http_response();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], 403);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("a@other.com"));
}
