//! Health check model

use serde::{Deserialize, Serialize};

/// Response from `/auth/health`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthStatus {
    /// API status, e.g. "ok"
    #[serde(default)]
    pub status: Option<String>,

    /// Database connectivity, e.g. "connected"
    #[serde(default)]
    pub database: Option<String>,
}

impl HealthStatus {
    pub fn status_or_unknown(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn database_or_unknown(&self) -> &str {
        self.database.as_deref().unwrap_or("unknown")
    }
}
