//! API trait definitions split by responsibility
//!
//! - [`AuthApi`] - login, registration, token checks and renewal
//! - [`HealthApi`] - service health probe

mod auth;
mod health;

pub use auth::AuthApi;
pub use health::HealthApi;
