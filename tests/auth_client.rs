//! AuthClient against a mocked identity service.

mod common;

use chrono::{TimeDelta, Utc};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fake_id_token, firebase_config};
use xirtam_admin::AppError;
use xirtam_admin::auth::AuthClient;

fn sign_in_response(id_token: &str) -> serde_json::Value {
    json!({
        "kind": "identitytoolkit#VerifyPasswordResponse",
        "localId": "uid-1",
        "email": "admin@example.com",
        "displayName": "",
        "idToken": id_token,
        "registered": true,
        "refreshToken": "refresh-1",
        "expiresIn": "3600"
    })
}

fn auth_error(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(400).set_body_json(json!({
        "error": {"code": 400, "message": message, "errors": []}
    }))
}

#[tokio::test]
async fn test_sign_in_admin() {
    let server = MockServer::start().await;
    let id_token = fake_id_token(&json!({"role": "admin", "email": "admin@example.com", "user_id": "uid-1"}));

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .and(query_param("key", "test-api-key"))
        .and(body_partial_json(json!({
            "email": "admin@example.com",
            "password": "secret",
            "returnSecureToken": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_response(&id_token)))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let session = auth.sign_in("admin@example.com", "secret").await.unwrap();

    assert_eq!(session.uid, "uid-1");
    assert_eq!(session.email, "admin@example.com");
    assert_eq!(session.refresh_token, "refresh-1");
    assert!(session.is_admin());
    assert!(session.expires_at > Utc::now() + TimeDelta::minutes(55));
    assert!(!session.needs_refresh(Utc::now()));
}

#[tokio::test]
async fn test_sign_in_without_admin_role() {
    let server = MockServer::start().await;
    let id_token = fake_id_token(&json!({"email": "student@example.com"}));

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_response(&id_token)))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let session = auth.sign_in("student@example.com", "secret").await.unwrap();

    assert!(!session.is_admin());
}

#[tokio::test]
async fn test_sign_in_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(auth_error("INVALID_LOGIN_CREDENTIALS"))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let err = auth.sign_in("admin@example.com", "wrong").await.unwrap_err();

    assert!(matches!(err, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_sign_in_other_error_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(auth_error(
            "TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled",
        ))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let err = auth.sign_in("admin@example.com", "secret").await.unwrap_err();

    match err {
        AppError::Auth(message) => assert!(message.starts_with("TOO_MANY_ATTEMPTS_TRY_LATER")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_refresh_exchanges_token() {
    let server = MockServer::start().await;
    let first = fake_id_token(&json!({"role": "admin"}));
    let second = fake_id_token(&json!({"role": "viewer"}));

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_response(&first)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .and(query_param("key", "test-api-key"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": second,
            "expires_in": "3600",
            "token_type": "Bearer",
            "refresh_token": "refresh-2",
            "id_token": second,
            "user_id": "uid-1",
            "project_id": "1234"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let session = auth.sign_in("admin@example.com", "secret").await.unwrap();
    let refreshed = auth.refresh(&session).await.unwrap();

    assert_eq!(refreshed.id_token, second);
    assert_eq!(refreshed.refresh_token, "refresh-2");
    assert_eq!(refreshed.email, "admin@example.com");
    assert!(!refreshed.is_admin());
}

#[tokio::test]
async fn test_refresh_with_revoked_token() {
    let server = MockServer::start().await;
    let id_token = fake_id_token(&json!({"role": "admin"}));

    Mock::given(method("POST"))
        .and(path("/v1/accounts:signInWithPassword"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sign_in_response(&id_token)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/token"))
        .respond_with(auth_error("TOKEN_EXPIRED"))
        .mount(&server)
        .await;

    let auth = AuthClient::new(&firebase_config(&server)).unwrap();
    let session = auth.sign_in("admin@example.com", "secret").await.unwrap();
    let err = auth.refresh(&session).await.unwrap_err();

    assert!(matches!(err, AppError::SessionExpired));
    assert!(err.requires_sign_in());
}
