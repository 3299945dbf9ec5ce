//! Identity service client (email/password sign-in and token refresh).

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, Utc};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::config::FirebaseConfig;
use crate::error::{AppError, Result};

/// Refresh this long before the ID token expires.
const REFRESH_MARGIN: TimeDelta = TimeDelta::minutes(5);

/// Claims read from the ID token payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Custom claim set by the provisioning script.
    #[serde(default)]
    pub role: Option<String>,
}

/// Signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub uid: String,
    pub email: String,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub claims: TokenClaims,
}

impl Session {
    /// Whether the account carries the `role: admin` custom claim.
    pub fn is_admin(&self) -> bool {
        self.claims.role.as_deref() == Some("admin")
    }

    /// Whether the ID token should be refreshed now.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now < REFRESH_MARGIN
    }
}

/// Decode the (unverified) payload of a JWT.
///
/// Only used to read the role claim for the UI; the database verifies the
/// token itself on every request.
pub fn decode_claims(id_token: &str) -> Result<TokenClaims> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| AppError::parse("ID token is not a JWT"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AppError::parse(format!("ID token payload: {e}")))?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
    user_id: String,
}

/// Identity service HTTP client.
pub struct AuthClient {
    client: Client,
    api_key: String,
    auth_url: String,
    token_url: String,
}

impl AuthClient {
    pub fn new(config: &FirebaseConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            auth_url: config.auth_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.trim_end_matches('/').to_string(),
        })
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let url = format!("{base}/accounts:signInWithPassword", base = self.auth_url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;

        let body: SignInResponse = check_auth_response(response).await?.json().await?;
        let claims = decode_claims(&body.id_token)?;
        info!("Signed in as {}", body.email);

        Ok(Session {
            uid: body.local_id,
            email: if body.email.is_empty() { email.to_string() } else { body.email },
            expires_at: expiry_from(&body.expires_in)?,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            claims,
        })
    }

    /// Exchange the refresh token for a fresh ID token.
    pub async fn refresh(&self, session: &Session) -> Result<Session> {
        let url = format!("{base}/token", base = self.token_url);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", session.refresh_token.as_str()),
            ])
            .send()
            .await?;

        let body: RefreshResponse = check_auth_response(response).await?.json().await?;
        let claims = decode_claims(&body.id_token)?;
        debug!("Refreshed ID token for {}", session.email);

        Ok(Session {
            uid: body.user_id,
            email: session.email.clone(),
            expires_at: expiry_from(&body.expires_in)?,
            id_token: body.id_token,
            refresh_token: body.refresh_token,
            claims,
        })
    }
}

fn expiry_from(expires_in: &str) -> Result<DateTime<Utc>> {
    let secs: i64 = expires_in
        .trim()
        .parse()
        .map_err(|_| AppError::parse(format!("Invalid expiresIn '{expires_in}'")))?;
    Ok(Utc::now() + TimeDelta::seconds(secs))
}

/// Map identity service error codes onto application errors.
pub fn map_auth_error(message: &str) -> AppError {
    let code = message.split(" : ").next().unwrap_or(message).trim();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "INVALID_EMAIL"
        | "MISSING_PASSWORD" => AppError::InvalidCredentials,
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => AppError::SessionExpired,
        "USER_DISABLED" => AppError::Auth("This account has been disabled".to_string()),
        _ => AppError::Auth(message.to_string()),
    }
}

async fn check_auth_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body: Value = response.json().await.unwrap_or(Value::Null);
    let message = body
        .pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string());
    Err(map_auth_error(&message))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    fn session(claims: TokenClaims, expires_at: DateTime<Utc>) -> Session {
        Session {
            uid: "uid".to_string(),
            email: "admin@example.com".to_string(),
            id_token: String::new(),
            refresh_token: String::new(),
            expires_at,
            claims,
        }
    }

    #[test]
    fn test_decode_admin_claims() {
        let token = token_with(r#"{"role":"admin","email":"admin@example.com","user_id":"u1","exp":1700000000}"#);
        let claims = decode_claims(&token).unwrap();

        assert_eq!(claims.role.as_deref(), Some("admin"));
    }

    #[test]
    fn test_decode_without_role() {
        let claims = decode_claims(&token_with(r#"{"email":"user@example.com"}"#)).unwrap();
        assert_eq!(claims.role, None);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_claims("not-a-jwt").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }

    #[test]
    fn test_is_admin() {
        let now = Utc::now();
        let admin = TokenClaims {
            role: Some("admin".to_string()),
        };
        let viewer = TokenClaims {
            role: Some("viewer".to_string()),
        };

        assert!(session(admin, now).is_admin());
        assert!(!session(viewer, now).is_admin());
        assert!(!session(TokenClaims::default(), now).is_admin());
    }

    #[test]
    fn test_needs_refresh() {
        let now = Utc::now();
        assert!(session(TokenClaims::default(), now + TimeDelta::minutes(4)).needs_refresh(now));
        assert!(!session(TokenClaims::default(), now + TimeDelta::minutes(30)).needs_refresh(now));
    }

    #[test]
    fn test_map_auth_error() {
        assert!(matches!(map_auth_error("INVALID_LOGIN_CREDENTIALS"), AppError::InvalidCredentials));
        assert!(matches!(map_auth_error("EMAIL_NOT_FOUND"), AppError::InvalidCredentials));
        assert!(matches!(map_auth_error("TOKEN_EXPIRED"), AppError::SessionExpired));
        assert!(matches!(
            map_auth_error("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            AppError::Auth(_)
        ));
        assert!(matches!(map_auth_error("USER_DISABLED"), AppError::Auth(_)));
    }

    #[test]
    fn test_expiry_from() {
        let expires = expiry_from("3600").unwrap();
        assert!(expires > Utc::now() + TimeDelta::minutes(59));
        assert!(expiry_from("soon").is_err());
    }
}
