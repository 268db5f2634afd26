//! Authentication API client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::models::{HealthStatus, RefreshRequest, RegisterRequest, TokenResponse, UserProfile};
use super::{AuthApi, HealthApi};
use crate::error::{ApiError, Result};

/// Maximum length of a raw response body quoted in an error message
const MAX_ERROR_BODY_LENGTH: usize = 300;

/// HTTP client for the Authentication and Health APIs
pub struct GatewayClient {
    http: HttpClient,
    base_url: String,
}

impl GatewayClient {
    /// Create a client for the given API base URL (e.g. `http://host/api/v1`)
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to an error carrying the server's detail
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = error_detail(status, &body);
        log::debug!("API responded {}: {}", status, detail);

        let err = match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(detail),
            StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
            StatusCode::NOT_FOUND => ApiError::NotFound(detail),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                ApiError::BadRequest(detail)
            }
            status if status.is_server_error() => ApiError::ServerError(detail),
            _ => ApiError::InvalidResponse(format!("Unexpected status code {}: {}", status, detail)),
        };
        Err(err.into())
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let data = response.json::<T>().await.map_err(|e| {
            ApiError::Decode(format!("Failed to parse {} response: {}", what, e))
        })?;
        Ok(data)
    }
}

/// Extract a human-readable message from an error body.
///
/// FastAPI-style services answer `{"detail": "..."}`, or a list of
/// `{"msg": "..."}` objects for validation errors.
pub(crate) fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        match value.get("detail") {
            Some(serde_json::Value::String(detail)) => return detail.clone(),
            Some(serde_json::Value::Array(items)) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }
    if trimmed.len() <= MAX_ERROR_BODY_LENGTH {
        trimmed.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !trimmed.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &trimmed[..end], trimmed.len())
    }
}

#[async_trait]
impl AuthApi for GatewayClient {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.url("/auth/login");
        log::debug!("POST {} (user {})", url, username);

        let response = self
            .http
            .post(&url)
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = Self::check_status(response).await?;
        Self::parse(response, "login").await
    }

    async fn register(&self, username: &str, password: &str) -> Result<()> {
        let url = self.url("/auth/register");
        log::debug!("POST {} (user {})", url, username);

        let response = self
            .http
            .post(&url)
            .json(&RegisterRequest { username, password })
            .send()
            .await
            .map_err(ApiError::from)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn me(&self, access_token: &str) -> Result<UserProfile> {
        let url = self.url("/auth/me");
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = Self::check_status(response).await?;
        Self::parse(response, "profile").await
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        let url = self.url("/auth/refresh");
        log::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = Self::check_status(response).await?;
        Self::parse(response, "refresh").await
    }
}

#[async_trait]
impl HealthApi for GatewayClient {
    async fn health(&self) -> Result<HealthStatus> {
        let url = self.url("/auth/health");
        log::debug!("GET {}", url);

        let response = self.http.get(&url).send().await.map_err(ApiError::from)?;
        let response = Self::check_status(response).await?;
        Self::parse(response, "health").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::UserId;
    use crate::error::Error;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> GatewayClient {
        GatewayClient::new(&format!("{}/api/v1/", server.url()), None).unwrap()
    }

    #[test]
    fn test_error_detail_string() {
        let detail = error_detail(
            StatusCode::UNAUTHORIZED,
            r#"{"detail": "Incorrect username or password"}"#,
        );
        assert_eq!(detail, "Incorrect username or password");
    }

    #[test]
    fn test_error_detail_validation_list() {
        let body = r#"{"detail": [{"loc": ["body", "password"], "msg": "field required"}, {"msg": "too short"}]}"#;
        let detail = error_detail(StatusCode::UNPROCESSABLE_ENTITY, body);
        assert_eq!(detail, "field required; too short");
    }

    #[test]
    fn test_error_detail_falls_back_to_body_or_reason() {
        assert_eq!(
            error_detail(StatusCode::BAD_GATEWAY, "upstream down"),
            "upstream down"
        );
        assert_eq!(error_detail(StatusCode::UNAUTHORIZED, ""), "Unauthorized");

        let long = "x".repeat(1000);
        let detail = error_detail(StatusCode::INTERNAL_SERVER_ERROR, &long);
        assert!(detail.contains("truncated, 1000 total bytes"));
    }

    #[tokio::test]
    async fn test_login_sends_form_and_parses_pair() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/auth/login")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "alice".into()),
                Matcher::UrlEncoded("password".into(), "s3cret".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token": "A1", "refresh_token": "R1", "token_type": "bearer"}"#)
            .create_async()
            .await;

        let pair = client_for(&server).login("alice", "s3cret").await.unwrap();
        assert_eq!(pair.access_token, "A1");
        assert_eq!(pair.refresh_token.as_deref(), Some("R1"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_login_failure_carries_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/auth/login")
            .with_status(401)
            .with_body(r#"{"detail": "Incorrect username or password"}"#)
            .create_async()
            .await;

        let err = client_for(&server).login("alice", "wrong").await.unwrap_err();
        match err {
            Error::Api(ApiError::Unauthorized(detail)) => {
                assert_eq!(detail, "Incorrect username or password")
            }
            other => panic!("Expected Unauthorized, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_me_uses_bearer_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/auth/me")
            .match_header("authorization", "Bearer A1")
            .with_status(200)
            .with_body(r#"{"id": 1, "username": "alice", "is_active": true, "is_admin": true}"#)
            .create_async()
            .await;

        let profile = client_for(&server).me("A1").await.unwrap();
        assert_eq!(profile.username, "alice");
        assert!(profile.is_admin);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_refresh_posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/auth/refresh")
            .match_body(Matcher::Json(serde_json::json!({"refresh_token": "R1"})))
            .with_status(200)
            .with_body(r#"{"access_token": "A2"}"#)
            .create_async()
            .await;

        let pair = client_for(&server).refresh("R1").await.unwrap();
        assert_eq!(pair.access_token, "A2");
        assert!(pair.refresh_token.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_register_conflict_is_bad_request() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/auth/register")
            .match_body(Matcher::Json(
                serde_json::json!({"username": "alice", "password": "pw"}),
            ))
            .with_status(400)
            .with_body(r#"{"detail": "Username already registered"}"#)
            .create_async()
            .await;

        let err = client_for(&server).register("alice", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Username already registered");
    }

    #[tokio::test]
    async fn test_health_tolerates_missing_fields() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/auth/health")
            .with_status(200)
            .with_body(r#"{"status": "ok"}"#)
            .create_async()
            .await;

        let health = client_for(&server).health().await.unwrap();
        assert_eq!(health.status_or_unknown(), "ok");
        assert_eq!(health.database_or_unknown(), "unknown");
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/auth/me")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = client_for(&server).me("A1").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn test_me_accepts_string_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/auth/me")
            .with_status(200)
            .with_body(
                r#"{"id": "3f2a9c1e", "username": "alice", "is_active": true, "is_admin": false}"#,
            )
            .create_async()
            .await;

        let profile = client_for(&server).me("A1").await.unwrap();
        assert_eq!(profile.id, UserId::Text("3f2a9c1e".to_string()));
        assert_eq!(profile.username, "alice");
    }

    #[tokio::test]
    async fn test_unexpected_status_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/auth/me")
            .with_status(405)
            .create_async()
            .await;

        let err = client_for(&server).me("A1").await.unwrap_err();
        assert!(matches!(err, Error::Api(ApiError::InvalidResponse(_))));
    }
}
