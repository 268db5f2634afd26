//! Display model implementations for table and JSON output
//!
//! Display models never carry credentials: only profile fields, health
//! fields and cycle outcomes are rendered.

mod cycle;
mod health;
mod profile;

pub use cycle::CycleDisplay;
pub use health::HealthDisplay;
pub use profile::ProfileDisplay;
