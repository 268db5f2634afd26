//! Session manager: one entry point for the CLI handlers

use std::sync::Arc;
use std::time::Duration;

use super::{
    CredentialPair, CredentialValidator, CycleOutcome, EndReason, GuardOutcome, Navigator,
    RefreshPolicy, Session, SessionGuard, SessionStore, SessionTeardown, ValidationSchedule,
    ValidatorState,
};
use crate::client::AuthApi;
use crate::error::{Result, SessionError};

/// Owns the session components for one process.
///
/// All components share one teardown, so however many paths try to end the
/// session, the user sees a single notice and a single redirect.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<SessionStore>,
    teardown: Arc<SessionTeardown>,
    validator: Arc<CredentialValidator>,
    period: Duration,
}

impl SessionManager {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        policy: RefreshPolicy,
        period: Duration,
    ) -> Self {
        let teardown = Arc::new(SessionTeardown::new(store.clone(), navigator));
        let validator = Arc::new(CredentialValidator::new(
            api.clone(),
            store.clone(),
            teardown.clone(),
            policy,
        ));
        Self {
            api,
            store,
            teardown,
            validator,
            period,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Admission check for a protected command
    pub fn guard(&self) -> GuardOutcome {
        SessionGuard::new(self.store.clone(), self.teardown.clone()).check()
    }

    /// Run one validation cycle now
    pub async fn check_now(&self) -> CycleOutcome {
        self.validator.check_now().await
    }

    pub fn validator_state(&self) -> ValidatorState {
        self.validator.state()
    }

    /// Periodic validation at the configured interval, not yet started
    pub fn schedule(&self) -> ValidationSchedule {
        ValidationSchedule::new(self.validator.clone(), self.period)
    }

    /// Sign in and persist the new session.
    ///
    /// Nothing is written unless both the login and the profile fetch succeed.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session> {
        self.ensure_signed_out()?;

        let issued = self.api.login(username, password).await?;
        let profile = self.api.me(&issued.access_token).await?;
        let credentials = CredentialPair::from(issued);

        self.store.save(&credentials, &profile)?;
        log::info!("Signed in as {}", profile.username);

        Ok(Session {
            credentials,
            profile,
        })
    }

    /// Create an account. The user signs in separately afterwards.
    pub async fn register(&self, username: &str, password: &str, confirm: &str) -> Result<()> {
        self.ensure_signed_out()?;

        if password != confirm {
            return Err(SessionError::PasswordMismatch.into());
        }

        self.api.register(username, password).await?;
        log::info!("Registered account {}", username);
        Ok(())
    }

    /// End the session at the user's request.
    ///
    /// Returns whether this call performed the redirect.
    pub fn logout(&self) -> bool {
        self.teardown.end_session(EndReason::Logout)
    }

    /// Fail with `SessionError::AlreadyAuthenticated` while a session is stored
    pub fn ensure_signed_out(&self) -> Result<()> {
        match self.store.load() {
            Ok(Some(session)) => {
                Err(SessionError::AlreadyAuthenticated(session.profile.username).into())
            }
            Ok(None) => Ok(()),
            // A fresh sign-in overwrites every entry, so an unreadable
            // session does not block it
            Err(e) => {
                log::debug!("Ignoring unreadable session before sign-in: {}", e);
                Ok(())
            }
        }
    }
}
