//! Authentication models

use serde::{Deserialize, Serialize};

/// Token pair returned by `/auth/login` and `/auth/refresh`
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Newly issued access token
    pub access_token: String,

    /// Refresh token, when the server issues one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Token type, normally "bearer"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl std::fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// JSON body for `/auth/register`
#[derive(Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// JSON body for `/auth/refresh`
#[derive(Serialize)]
pub struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}
