//! Authentication API trait

use async_trait::async_trait;

use crate::client::models::{TokenResponse, UserProfile};
use crate::error::Result;

/// Authentication operations consumed by the session core
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange username and password for a token pair
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse>;

    /// Create a new account
    async fn register(&self, username: &str, password: &str) -> Result<()>;

    /// Fetch the profile behind an access token; fails if the token is rejected
    async fn me(&self, access_token: &str) -> Result<UserProfile>;

    /// Exchange a refresh token for a new token pair
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse>;
}
