//! User profile model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account identifier. Some deployments issue integers, others opaque strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(i64),
    Text(String),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(id) => write!(f, "{}", id),
            UserId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        UserId::Number(id)
    }
}

/// Profile returned by `/auth/me`.
///
/// Every field is required: the same type decodes the cached profile, and a
/// cached entry with missing fields must read as corrupted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User ID
    pub id: UserId,

    /// Login name
    pub username: String,

    /// Whether the account is enabled
    pub is_active: bool,

    /// Whether the account has admin rights
    pub is_admin: bool,
}

impl UserProfile {
    /// Account state label for display
    pub fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "disabled" }
    }

    /// Role label for display
    pub fn role_label(&self) -> &'static str {
        if self.is_admin { "admin" } else { "user" }
    }
}
