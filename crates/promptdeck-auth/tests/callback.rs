// SPDX-FileCopyrightText: 2026 Promptdeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback outcomes against a mocked auth provider.

use std::sync::Arc;

use chrono::Duration;
use promptdeck_auth::{
    AuthService, CallbackError, DomainPolicy, HttpAuthProvider, SessionRegistry,
};
use promptdeck_core::{AuthAdapter, PromptdeckError};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": "provider-access",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": { "id": "user-1", "email": email }
    })
}

async fn service(server: &MockServer) -> AuthService {
    let provider = HttpAuthProvider::new(server.uri(), Some("anon-key")).unwrap();
    AuthService::new(
        Arc::new(provider),
        DomainPolicy::new("shopos.ai"),
        Arc::new(SessionRegistry::new(Duration::days(7))),
        "promptdeck_session",
    )
}

#[tokio::test]
async fn valid_code_registers_a_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(query_param("grant_type", "authorization_code"))
        .and(header("apikey", "anon-key"))
        .and(body_json(serde_json::json!({ "auth_code": "abc" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("dev@shopos.ai")))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server).await;
    let token = auth.complete_sign_in(Some("abc")).await.unwrap();
    let session = auth.sessions().lookup(&token).unwrap();
    assert_eq!(session.email, "dev@shopos.ai");
    assert_eq!(session.user_id, "user-1");
}

#[tokio::test]
async fn missing_code_never_reaches_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let auth = service(&server).await;
    assert_eq!(auth.complete_sign_in(None).await, Err(CallbackError::NoCode));
    assert_eq!(auth.complete_sign_in(Some("  ")).await, Err(CallbackError::NoCode));
}

#[tokio::test]
async fn rejected_code_is_auth_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error_description": "invalid flow state" })),
        )
        .mount(&server)
        .await;

    let provider = HttpAuthProvider::new(server.uri(), None).unwrap();
    let err = provider.exchange_code("stale").await.unwrap_err();
    assert!(
        matches!(&err, PromptdeckError::Auth { message, .. } if message.contains("invalid flow state"))
    );

    let auth = service(&server).await;
    assert_eq!(
        auth.complete_sign_in(Some("stale")).await,
        Err(CallbackError::AuthFailed)
    );
    assert!(auth.sessions().is_empty());
}

#[tokio::test]
async fn outside_domain_is_signed_out_and_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("someone@gmail.com")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(header("authorization", "Bearer provider-access"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server).await;
    assert_eq!(
        auth.complete_sign_in(Some("abc")).await,
        Err(CallbackError::InvalidDomain)
    );
    assert!(auth.sessions().is_empty());
}

#[tokio::test]
async fn malformed_provider_response_is_callback_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let auth = service(&server).await;
    assert_eq!(
        auth.complete_sign_in(Some("abc")).await,
        Err(CallbackError::CallbackFailed)
    );
}

#[tokio::test]
async fn sign_out_revokes_locally_and_at_the_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("dev@shopos.ai")))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let auth = service(&server).await;
    let token = auth.complete_sign_in(Some("abc")).await.unwrap();
    auth.sign_out(&token).await;
    assert!(auth.sessions().lookup(&token).is_none());
}
