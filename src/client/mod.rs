//! Authentication API client

pub mod api;
pub mod gateway;
#[cfg(test)]
pub mod mock;
pub mod models;

pub use api::{AuthApi, HealthApi};
pub use gateway::GatewayClient;
#[cfg(test)]
pub use mock::MockAuthClient;

