//! Hosted backend access: bearer-token verification and usage logging.

pub mod usage;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::config::Secrets;

pub use usage::{NoopUsage, SupabaseUsage, UsageRecord, UsageRecorder};

/// The signed-in user a bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header. Use: Bearer <token>")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Authentication backend is not configured")]
    NotConfigured,
    #[error("Authentication backend unavailable: {0}")]
    Backend(String),
}

#[async_trait]
pub trait AuthVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError>;
}

/// Verifies access tokens against `GET {url}/auth/v1/user`.
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(client: Client, base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// `None` unless both the project URL and the anon key are set.
    pub fn from_secrets(client: Client, secrets: &Secrets) -> Option<Self> {
        let url = secrets.supabase_url.as_deref()?;
        let key = secrets.supabase_anon_key.as_deref()?;
        Some(Self::new(client, url, key))
    }
}

#[async_trait]
impl AuthVerifier for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let res = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                warn!("Auth backend request failed: {}", e);
                AuthError::Backend(e.to_string())
            })?;

        match res.status() {
            status if status.is_success() => {
                let user: AuthUser = res
                    .json()
                    .await
                    .map_err(|e| AuthError::Backend(e.to_string()))?;
                debug!("Authenticated user {}", user.id);
                Ok(user)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AuthError::InvalidToken),
            status => {
                warn!("Auth backend answered HTTP {}", status);
                Err(AuthError::InvalidToken)
            }
        }
    }
}

/// Stands in when auth is required but no backend is configured. Every
/// request is refused.
pub struct Unconfigured;

#[async_trait]
impl AuthVerifier for Unconfigured {
    async fn verify(&self, _token: &str) -> Result<AuthUser, AuthError> {
        Err(AuthError::NotConfigured)
    }
}

/// Token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{MockServer, RequestLog};
    use axum::http::HeaderMap;
    use axum::response::IntoResponse;
    use axum::{Json, Router, routing::get};
    use serde_json::{Value, json};

    async fn supabase(log: RequestLog) -> MockServer {
        let app = Router::new().route(
            "/auth/v1/user",
            get(move |headers: HeaderMap| {
                let log = log.clone();
                async move {
                    let ok = headers
                        .get("authorization")
                        .is_some_and(|v| v == "Bearer good-jwt");
                    log.push(headers, Value::Null);
                    if ok {
                        Json(json!({ "id": "user-1", "email": "seller@example.com", "aud": "authenticated" }))
                            .into_response()
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({ "msg": "invalid JWT" })),
                        )
                            .into_response()
                    }
                }
            }),
        );
        MockServer::start(app).await
    }

    #[tokio::test]
    async fn valid_token_resolves_user_and_sends_anon_key() {
        let log = RequestLog::default();
        let server = supabase(log.clone()).await;
        let auth = SupabaseAuth::new(Client::new(), format!("{}/", server.base_url), "anon");

        let user = auth.verify("good-jwt").await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.email.as_deref(), Some("seller@example.com"));
        assert_eq!(log.get(0).headers.get("apikey").unwrap(), "anon");
    }

    #[tokio::test]
    async fn rejected_token_is_invalid() {
        let server = supabase(RequestLog::default()).await;
        let auth = SupabaseAuth::new(Client::new(), &server.base_url, "anon");
        assert!(matches!(
            auth.verify("forged").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn unreachable_backend_is_reported() {
        let auth = SupabaseAuth::new(Client::new(), "http://127.0.0.1:1", "anon");
        assert!(matches!(
            auth.verify("any").await,
            Err(AuthError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn unconfigured_backend_refuses_everyone() {
        assert!(matches!(
            Unconfigured.verify("good-jwt").await,
            Err(AuthError::NotConfigured)
        ));
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token(Some("Bearer abc")).unwrap(), "abc");
        assert!(bearer_token(Some("Basic abc")).is_err());
        assert!(bearer_token(Some("Bearer  ")).is_err());
        assert!(bearer_token(None).is_err());
    }

    #[test]
    fn from_secrets_needs_url_and_key() {
        let mut secrets = Secrets::default();
        assert!(SupabaseAuth::from_secrets(Client::new(), &secrets).is_none());
        secrets.supabase_url = Some("https://proj.supabase.co".to_string());
        assert!(SupabaseAuth::from_secrets(Client::new(), &secrets).is_none());
        secrets.supabase_anon_key = Some("anon".to_string());
        assert!(SupabaseAuth::from_secrets(Client::new(), &secrets).is_some());
    }
}
