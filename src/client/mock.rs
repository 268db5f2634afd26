//! Mock Authentication API client for testing
//!
//! Provides a scripted implementation of the API traits so the session core
//! can be exercised without a server.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use super::api::{AuthApi, HealthApi};
use super::models::{HealthStatus, TokenResponse, UserProfile};
use crate::error::{ApiError, Result};

/// A recorded API call. Tokens are recorded so tests can check which
/// credential each call used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    Login(String),
    Register(String),
    Me(String),
    Refresh(String),
    Health,
}

/// Mock API client for testing.
///
/// `/auth/me` accepts exactly the tokens registered with [`accept_token`]
/// and answers 401 for everything else. Refresh results are scripted per
/// refresh token and consumed in order; an unscripted refresh token is
/// rejected.
///
/// # Example
/// ```ignore
/// let mock = MockAuthClient::new()
///     .with_profile(profile)
///     .accept_token("A1")
///     .with_refresh("R1", Ok(tokens("A2", None)));
/// ```
///
/// [`accept_token`]: MockAuthClient::accept_token
#[derive(Default)]
pub struct MockAuthClient {
    /// Result of the next login calls (persistent)
    login: Mutex<Option<std::result::Result<TokenResponse, ApiError>>>,
    /// Error returned by register, if any
    register_error: Mutex<Option<ApiError>>,
    /// Profile returned by a successful `me`
    profile: Mutex<Option<UserProfile>>,
    /// Access tokens `me` accepts
    accepted: Mutex<HashSet<String>>,
    /// One-shot error for the next `me` call (e.g. a network failure)
    me_error: Mutex<Option<ApiError>>,
    /// When set, `me` waits for a notification before answering
    me_gate: Mutex<Option<Arc<Notify>>>,
    /// Scripted refresh results keyed by refresh token
    refresh: Mutex<HashMap<String, VecDeque<std::result::Result<TokenResponse, ApiError>>>>,
    /// Health response; an error when unset
    health: Mutex<Option<HealthStatus>>,
    /// Every call, in order
    calls: Mutex<Vec<ApiCall>>,
}

/// Build a token response for tests
pub fn tokens(access: &str, refresh: Option<&str>) -> TokenResponse {
    TokenResponse {
        access_token: access.to_string(),
        refresh_token: refresh.map(|r| r.to_string()),
        token_type: Some("bearer".to_string()),
    }
}

/// Build a profile for tests
pub fn profile(id: i64, username: &str) -> UserProfile {
    UserProfile {
        id: id.into(),
        username: username.to_string(),
        is_active: true,
        is_admin: false,
    }
}

impl MockAuthClient {
    /// Create a new mock client that rejects everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the login result.
    pub fn with_login(mut self, result: std::result::Result<TokenResponse, ApiError>) -> Self {
        *self.login.get_mut() = Some(result);
        self
    }

    /// Make register fail with the given error.
    pub fn with_register_error(mut self, error: ApiError) -> Self {
        *self.register_error.get_mut() = Some(error);
        self
    }

    /// Configure the profile returned by `me`.
    pub fn with_profile(mut self, profile: UserProfile) -> Self {
        *self.profile.get_mut() = Some(profile);
        self
    }

    /// Let `me` accept an access token.
    pub fn accept_token(mut self, token: &str) -> Self {
        self.accepted.get_mut().insert(token.to_string());
        self
    }

    /// Script the next result for a refresh token.
    pub fn with_refresh(
        mut self,
        refresh_token: &str,
        result: std::result::Result<TokenResponse, ApiError>,
    ) -> Self {
        self.refresh
            .get_mut()
            .entry(refresh_token.to_string())
            .or_default()
            .push_back(result);
        self
    }

    /// Configure the health response.
    pub fn with_health(mut self, health: HealthStatus) -> Self {
        *self.health.get_mut() = Some(health);
        self
    }

    /// Make `me` block until the gate is notified.
    pub fn with_me_gate(mut self, gate: Arc<Notify>) -> Self {
        *self.me_gate.get_mut() = Some(gate);
        self
    }

    /// Stop accepting an access token (server-side expiry).
    pub async fn revoke_token(&self, token: &str) {
        self.accepted.lock().await.remove(token);
    }

    /// Fail the next `me` call with the given error.
    pub async fn fail_next_me(&self, error: ApiError) {
        *self.me_error.lock().await = Some(error);
    }

    /// All calls made so far.
    pub async fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().await.clone()
    }

    /// Number of `me` calls made so far.
    pub async fn me_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, ApiCall::Me(_)))
            .count()
    }

    /// Number of refresh calls made so far.
    pub async fn refresh_calls(&self) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|c| matches!(c, ApiCall::Refresh(_)))
            .count()
    }

    async fn record(&self, call: ApiCall) {
        self.calls.lock().await.push(call);
    }
}

fn rejected() -> ApiError {
    ApiError::Unauthorized("Could not validate credentials".to_string())
}

#[async_trait]
impl AuthApi for MockAuthClient {
    async fn login(&self, username: &str, _password: &str) -> Result<TokenResponse> {
        self.record(ApiCall::Login(username.to_string())).await;
        match self.login.lock().await.clone() {
            Some(result) => Ok(result?),
            None => Err(ApiError::Unauthorized("Incorrect username or password".into()).into()),
        }
    }

    async fn register(&self, username: &str, _password: &str) -> Result<()> {
        self.record(ApiCall::Register(username.to_string())).await;
        match self.register_error.lock().await.clone() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }

    async fn me(&self, access_token: &str) -> Result<UserProfile> {
        self.record(ApiCall::Me(access_token.to_string())).await;

        let gate = self.me_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(error) = self.me_error.lock().await.take() {
            return Err(error.into());
        }
        if !self.accepted.lock().await.contains(access_token) {
            return Err(rejected().into());
        }
        self.profile
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::InvalidResponse("no profile configured".into()).into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse> {
        self.record(ApiCall::Refresh(refresh_token.to_string())).await;
        let next = self
            .refresh
            .lock()
            .await
            .get_mut(refresh_token)
            .and_then(|queue| queue.pop_front());
        match next {
            Some(result) => Ok(result?),
            None => Err(ApiError::Unauthorized("Invalid refresh token".into()).into()),
        }
    }
}

#[async_trait]
impl HealthApi for MockAuthClient {
    async fn health(&self) -> Result<HealthStatus> {
        self.record(ApiCall::Health).await;
        self.health
            .lock()
            .await
            .clone()
            .ok_or_else(|| ApiError::Network("Failed to connect to API".into()).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_me_accepts_only_registered_tokens() {
        let mock = MockAuthClient::new()
            .with_profile(profile(1, "alice"))
            .accept_token("A1");

        assert!(mock.me("A1").await.is_ok());
        assert!(mock.me("A2").await.is_err());

        mock.revoke_token("A1").await;
        assert!(mock.me("A1").await.is_err());
        assert_eq!(mock.me_calls().await, 3);
    }

    #[tokio::test]
    async fn test_refresh_results_are_consumed_in_order() {
        let mock = MockAuthClient::new()
            .with_refresh("R1", Ok(tokens("A2", None)))
            .with_refresh("R1", Err(rejected()));

        assert_eq!(mock.refresh("R1").await.unwrap().access_token, "A2");
        assert!(mock.refresh("R1").await.is_err());
        assert!(mock.refresh("R1").await.is_err());
        assert_eq!(mock.refresh_calls().await, 3);
    }

    #[tokio::test]
    async fn test_health_fails_until_configured() {
        assert!(MockAuthClient::new().health().await.is_err());

        let mock = MockAuthClient::new().with_health(HealthStatus {
            status: Some("ok".to_string()),
            database: Some("connected".to_string()),
        });
        let health = mock.health().await.unwrap();
        assert_eq!(health.database_or_unknown(), "connected");
        assert_eq!(mock.calls().await, vec![ApiCall::Health]);
    }

    #[tokio::test]
    async fn test_one_shot_me_error() {
        let mock = MockAuthClient::new()
            .with_profile(profile(1, "alice"))
            .accept_token("A1");
        mock.fail_next_me(ApiError::Network("reset".into())).await;

        assert!(mock.me("A1").await.is_err());
        assert!(mock.me("A1").await.is_ok());
    }
}
