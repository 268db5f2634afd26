//! Session-credential lifecycle
//!
//! This module owns the access/refresh token pair and decides when
//! credentials are stale:
//! - [`SessionStore`]: persisted token pair and cached profile
//! - [`SessionGuard`]: admits protected commands only with a usable session
//! - [`CredentialValidator`]: one check of the access token, renewing on rejection
//! - [`CredentialRenewer`]: exchanges the refresh token for a new pair
//! - [`SessionTeardown`]: clears the store and sends the user back to login
//! - [`ValidationSchedule`]: runs validation cycles on a fixed period
//!
//! [`SessionManager`] wires these together for the CLI.

mod backend;
mod guard;
mod manager;
mod renewer;
mod schedule;
mod store;
mod teardown;
mod validator;

pub use guard::{GuardOutcome, SessionGuard};
pub use manager::SessionManager;
pub use renewer::{CredentialRenewer, RefreshPolicy};
pub use schedule::{CycleReport, ScheduleHandle, ValidationSchedule};
pub use store::{RefreshUpdate, SessionStore};
pub use teardown::{EndReason, Navigator, SessionTeardown};
pub use validator::{CredentialValidator, CycleOutcome, ValidatorState};

#[cfg(test)]
pub use teardown::RecordingNavigator;

use crate::client::models::{TokenResponse, UserProfile};

/// Access token plus optional refresh token. Both are bearer secrets, so
/// `Debug` never prints them.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl From<TokenResponse> for CredentialPair {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
        }
    }
}

/// A stored session: credentials and the profile cached alongside them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub credentials: CredentialPair,
    pub profile: UserProfile,
}
