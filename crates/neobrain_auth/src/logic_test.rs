#[cfg(test)]
mod tests {
    use crate::error::AuthError;
    use crate::gate::DomainGate;
    use crate::logic::{authenticate, check_state};
    use crate::provider::MockIdentityProvider;
    use crate::verify::IdClaims;
    use mockall::predicate::eq;
    use neobrain_common::{NeoBrainError, OAuthToken};

    fn gate() -> DomainGate {
        DomainGate::new("@neo.com.pe")
    }

    fn token_with_id() -> OAuthToken {
        OAuthToken {
            access_token: Some("access".into()),
            id_token: Some("header.payload.sig".into()),
            scope: Some("openid email".into()),
            ..Default::default()
        }
    }

    fn claims(email: Option<&str>, verified: Option<bool>) -> IdClaims {
        IdClaims {
            sub: "1234".into(),
            email: email.map(str::to_string),
            email_verified: verified,
            exp: 4_000_000_000,
        }
    }

    fn provider_returning(claims_result: IdClaims) -> MockIdentityProvider {
        let mut provider = MockIdentityProvider::new();
        provider
            .expect_exchange_code()
            .with(eq("code-1"))
            .times(1)
            .returning(|_| Ok(token_with_id()));
        provider
            .expect_verify_id_token()
            .with(eq("header.payload.sig"))
            .times(1)
            .returning(move |_| Ok(claims_result.clone()));
        provider
    }

    #[test]
    fn test_check_state() {
        assert!(check_state(Some("abc"), Some("abc")).is_ok());
        assert!(matches!(check_state(Some("abc"), Some("xyz")), Err(AuthError::StateMismatch)));
        assert!(matches!(check_state(None, Some("abc")), Err(AuthError::StateMismatch)));
        assert!(matches!(check_state(Some("abc"), None), Err(AuthError::StateMismatch)));
        assert!(matches!(check_state(Some(""), Some("")), Err(AuthError::StateMismatch)));
    }

    #[tokio::test]
    async fn test_authenticate_accepts_domain_email() {
        let provider = provider_returning(claims(Some("ana@neo.com.pe"), Some(true)));
        let outcome = authenticate(&provider, &gate(), "code-1").await.unwrap();
        assert_eq!(outcome.email, "ana@neo.com.pe");
        assert_eq!(outcome.token, token_with_id());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_other_domain() {
        let provider = provider_returning(claims(Some("ana@gmail.com"), Some(true)));
        let err = authenticate(&provider, &gate(), "code-1").await.unwrap_err();
        assert!(matches!(err, AuthError::DomainRejected(ref e) if e == "ana@gmail.com"));
        assert!(matches!(
            NeoBrainError::from(err),
            NeoBrainError::AuthDomainRejected(_)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_unverified_email() {
        let provider = provider_returning(claims(Some("ana@neo.com.pe"), Some(false)));
        let err = authenticate(&provider, &gate(), "code-1").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailUnverified(_)));
    }

    #[tokio::test]
    async fn test_authenticate_requires_email_claim() {
        let provider = provider_returning(claims(None, None));
        let err = authenticate(&provider, &gate(), "code-1").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailMissing));
    }

    #[tokio::test]
    async fn test_authenticate_requires_id_token() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_exchange_code().returning(|_| {
            Ok(OAuthToken {
                access_token: Some("access".into()),
                ..Default::default()
            })
        });
        provider.expect_verify_id_token().never();

        let err = authenticate(&provider, &gate(), "code-1").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingIdToken));
    }

    #[tokio::test]
    async fn test_exchange_failure_keeps_raw_text() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_exchange_code().returning(|_| {
            Err(AuthError::TokenExchange(
                r#"{"error":"invalid_grant","error_description":"Bad Request"}"#.into(),
            ))
        });

        let err = authenticate(&provider, &gate(), "code-1").await.unwrap_err();
        match NeoBrainError::from(err) {
            NeoBrainError::TokenExchangeFailed(raw) => assert!(raw.contains("invalid_grant")),
            other => panic!("expected TokenExchangeFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_code_never_reaches_provider() {
        let mut provider = MockIdentityProvider::new();
        provider.expect_exchange_code().never();
        let err = authenticate(&provider, &gate(), "  ").await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCode));
    }
}
