//! Authentication API data models

mod auth;
mod health;
mod user;

pub use auth::{RefreshRequest, RegisterRequest, TokenResponse};
pub use health::HealthStatus;
pub use user::{UserId, UserProfile};
