//! Health API trait

use async_trait::async_trait;

use crate::client::models::HealthStatus;
use crate::error::Result;

/// Service health probe, used only by the health display
#[async_trait]
pub trait HealthApi: Send + Sync {
    async fn health(&self) -> Result<HealthStatus>;
}
