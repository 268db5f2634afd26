//! User profile display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::{UserId, UserProfile};

/// Profile display model for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ProfileDisplay {
    /// User ID
    #[tabled(rename = "USER ID")]
    pub id: UserId,

    /// Login name
    #[tabled(rename = "USERNAME")]
    pub username: String,

    /// Account state (active, disabled)
    #[tabled(rename = "STATUS")]
    pub status: String,

    /// Role (admin, user)
    #[tabled(rename = "ROLE")]
    pub role: String,
}

impl From<&UserProfile> for ProfileDisplay {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            username: profile.username.clone(),
            status: profile.status_label().to_string(),
            role: profile.role_label().to_string(),
        }
    }
}
