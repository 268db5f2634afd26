//! Health display model

use serde::Serialize;
use tabled::Tabled;

use crate::client::models::HealthStatus;
use crate::error::Result;

/// Health display model; transport failures render as `error`.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct HealthDisplay {
    /// API status
    #[tabled(rename = "API")]
    pub status: String,

    /// Database connectivity
    #[tabled(rename = "DATABASE")]
    pub database: String,
}

impl From<Result<HealthStatus>> for HealthDisplay {
    fn from(result: Result<HealthStatus>) -> Self {
        match result {
            Ok(health) => Self {
                status: health.status_or_unknown().to_string(),
                database: health.database_or_unknown().to_string(),
            },
            Err(e) => {
                log::warn!("Health check failed: {}", e);
                Self {
                    status: "error".to_string(),
                    database: "error".to_string(),
                }
            }
        }
    }
}
