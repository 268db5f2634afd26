//! Credential renewal via the refresh endpoint

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{RefreshUpdate, SessionStore};
use crate::client::AuthApi;
use crate::error::Result;

/// What to do with the stored refresh token when a renewal response does
/// not include a new one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Keep using the previous refresh token
    #[default]
    Retain,
    /// Refresh tokens are single-use: drop the previous one
    Rotate,
}

impl RefreshPolicy {
    fn update_for(self, issued: Option<String>) -> RefreshUpdate {
        match (issued, self) {
            (Some(token), _) => RefreshUpdate::Replace(token),
            (None, RefreshPolicy::Retain) => RefreshUpdate::Keep,
            (None, RefreshPolicy::Rotate) => RefreshUpdate::Remove,
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshPolicy::Retain => f.write_str("retain"),
            RefreshPolicy::Rotate => f.write_str("rotate"),
        }
    }
}

/// Exchanges a refresh token for a new pair and stores it. One attempt per
/// call, no retries.
pub struct CredentialRenewer {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
    policy: RefreshPolicy,
}

impl CredentialRenewer {
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<SessionStore>, policy: RefreshPolicy) -> Self {
        Self { api, store, policy }
    }

    /// Renew the credentials. On failure the store is left as it was.
    pub async fn renew(&self, refresh_token: &str) -> Result<()> {
        let issued = self.api.refresh(refresh_token).await?;
        let rotated = issued.refresh_token.is_some();

        self.store
            .replace_tokens(issued.access_token, self.policy.update_for(issued.refresh_token))?;

        log::info!(
            "Access token renewed (refresh token {})",
            if rotated { "rotated" } else { "unchanged" }
        );
        Ok(())
    }
}
