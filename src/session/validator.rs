//! Credential validation cycle

use std::sync::Arc;

use tokio::sync::Mutex;

use super::{CredentialRenewer, EndReason, RefreshPolicy, SessionStore, SessionTeardown};
use crate::client::AuthApi;
use crate::client::models::UserProfile;
use crate::error::{ApiError, Error, SessionError};

/// Validator state: credentials are assumed valid between checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorState {
    Valid,
    Checking,
}

/// Result of one validation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The access token was accepted
    Valid,
    /// The access token was rejected and the refresh token replaced it
    Renewed,
    /// The session was torn down
    Ended(EndReason),
    /// Another cycle was in flight; nothing was done
    AlreadyChecking,
}

/// Checks the stored access token against `/auth/me`, renewing or tearing
/// down on rejection.
pub struct CredentialValidator {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
    renewer: CredentialRenewer,
    teardown: Arc<SessionTeardown>,
    in_flight: Mutex<()>,
}

impl CredentialValidator {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<SessionStore>,
        teardown: Arc<SessionTeardown>,
        policy: RefreshPolicy,
    ) -> Self {
        let renewer = CredentialRenewer::new(api.clone(), store.clone(), policy);
        Self {
            api,
            store,
            renewer,
            teardown,
            in_flight: Mutex::new(()),
        }
    }

    pub fn state(&self) -> ValidatorState {
        match self.in_flight.try_lock() {
            Ok(_) => ValidatorState::Valid,
            Err(_) => ValidatorState::Checking,
        }
    }

    /// Run one validation cycle to completion.
    ///
    /// The access token is read from the store at the start of every cycle,
    /// never carried over from an earlier one.
    pub async fn check_now(&self) -> CycleOutcome {
        let Ok(_cycle) = self.in_flight.try_lock() else {
            log::debug!("Validation cycle already in flight");
            return CycleOutcome::AlreadyChecking;
        };

        let failure = match self.store.access_token() {
            None => "no access token stored".to_string(),
            Some(token) => match self.api.me(&token).await {
                Ok(profile) => {
                    self.sync_profile(&profile);
                    log::debug!("Access token accepted");
                    return CycleOutcome::Valid;
                }
                // Accepted by status; only the profile body was unusable
                Err(Error::Api(ApiError::Decode(detail))) => {
                    log::warn!("Keeping cached profile: {}", detail);
                    return CycleOutcome::Valid;
                }
                Err(e) => e.to_string(),
            },
        };
        log::warn!("Credential check failed: {}", failure);

        let Some(refresh_token) = self.store.refresh_token() else {
            self.teardown.end_session(EndReason::ValidationFailed);
            return CycleOutcome::Ended(EndReason::ValidationFailed);
        };

        match self.renewer.renew(&refresh_token).await {
            Ok(()) => CycleOutcome::Renewed,
            Err(e) => {
                log::warn!("Credential renewal failed: {}", e);
                self.teardown.end_session(EndReason::RenewalFailed);
                CycleOutcome::Ended(EndReason::RenewalFailed)
            }
        }
    }

    /// Bring the cached profile in line with what the server reports
    fn sync_profile(&self, fresh: &UserProfile) {
        let stale = match self.store.load() {
            Ok(Some(session)) => session.profile != *fresh,
            Ok(None) => false,
            Err(Error::Session(SessionError::CorruptProfile(_))) => true,
            Err(e) => {
                log::warn!("Could not read cached profile: {}", e);
                false
            }
        };
        if stale {
            match self.store.update_profile(fresh) {
                Ok(()) => log::debug!("Cached profile updated"),
                Err(e) => log::debug!("Cached profile not updated: {}", e),
            }
        }
    }
}
