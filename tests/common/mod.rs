//! Shared helpers for the HTTP integration tests.
#![allow(dead_code)]

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use wiremock::MockServer;

use xirtam_admin::config::FirebaseConfig;
use xirtam_admin::realtime::RtdbClient;

pub const TOKEN: &str = "test-id-token";

/// Database client pointed at the mock server, signed in with [`TOKEN`].
pub fn rtdb_client(server: &MockServer) -> RtdbClient {
    RtdbClient::new(&server.uri(), Duration::from_secs(5))
        .expect("client")
        .with_auth(TOKEN)
}

/// Firebase settings whose endpoints all live on the mock server.
pub fn firebase_config(server: &MockServer) -> FirebaseConfig {
    FirebaseConfig {
        api_key: "test-api-key".to_string(),
        database_url: server.uri(),
        auth_url: format!("{}/v1", server.uri()),
        token_url: format!("{}/v1", server.uri()),
        request_timeout_secs: 5,
    }
}

/// Unsigned JWT carrying `claims`.
pub fn fake_id_token(claims: &Value) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    )
}

/// Server-sent events body from `(event, data)` pairs.
pub fn sse_body(events: &[(&str, &str)]) -> String {
    events
        .iter()
        .map(|(event, data)| format!("event: {event}\ndata: {data}\n\n"))
        .collect()
}
