//! Admission check for protected commands

use std::sync::Arc;

use super::{EndReason, Session, SessionStore, SessionTeardown};
use crate::error::{Error, SessionError};

/// Result of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// A usable session exists
    Admitted(Session),
    /// The user was sent back to the entry point. Carries the teardown
    /// reason when a stored session had to be destroyed.
    Redirected(Option<EndReason>),
}

/// Checks the store once per protected command
pub struct SessionGuard {
    store: Arc<SessionStore>,
    teardown: Arc<SessionTeardown>,
}

impl SessionGuard {
    pub fn new(store: Arc<SessionStore>, teardown: Arc<SessionTeardown>) -> Self {
        Self { store, teardown }
    }

    /// Admit or redirect. Nothing from a corrupted session is ever returned.
    pub fn check(&self) -> GuardOutcome {
        match self.store.load() {
            Ok(Some(session)) => {
                log::debug!("Session admitted for {}", session.profile.username);
                GuardOutcome::Admitted(session)
            }
            Ok(None) => {
                self.teardown.redirect_anonymous();
                GuardOutcome::Redirected(None)
            }
            Err(Error::Session(SessionError::CorruptProfile(detail))) => {
                log::warn!("Discarding corrupted session: {}", detail);
                self.teardown.end_session(EndReason::CorruptState);
                GuardOutcome::Redirected(Some(EndReason::CorruptState))
            }
            Err(e) => {
                log::warn!("Could not read session storage: {}", e);
                self.teardown.end_session(EndReason::CorruptState);
                GuardOutcome::Redirected(Some(EndReason::CorruptState))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::profile;
    use crate::session::{CredentialPair, RecordingNavigator};
    use tempfile::tempdir;

    fn guard_for(store: Arc<SessionStore>) -> (SessionGuard, Arc<RecordingNavigator>) {
        let nav = RecordingNavigator::new();
        let teardown = Arc::new(SessionTeardown::new(store.clone(), nav.clone()));
        (SessionGuard::new(store, teardown), nav)
    }

    #[test]
    fn test_stored_session_is_admitted() {
        let store = Arc::new(SessionStore::in_memory());
        store
            .save(
                &CredentialPair {
                    access_token: "A1".to_string(),
                    refresh_token: None,
                },
                &profile(7, "carol"),
            )
            .unwrap();
        let (guard, nav) = guard_for(store);

        match guard.check() {
            GuardOutcome::Admitted(session) => assert_eq!(session.profile.username, "carol"),
            other => panic!("expected admission, got {:?}", other),
        }
        assert_eq!(nav.redirects(), 0);
    }

    #[test]
    fn test_missing_session_redirects_without_notice() {
        let (guard, nav) = guard_for(Arc::new(SessionStore::in_memory()));

        assert_eq!(guard.check(), GuardOutcome::Redirected(None));
        assert_eq!(nav.redirects(), 1);
        assert!(nav.notices().is_empty());
    }

    #[test]
    fn test_corrupted_profile_is_cleared() {
        let store = Arc::new(SessionStore::in_memory());
        store
            .save(
                &CredentialPair {
                    access_token: "A1".to_string(),
                    refresh_token: Some("R1".to_string()),
                },
                &profile(1, "alice"),
            )
            .unwrap();
        store.put_raw("user", "not-a-profile");
        let (guard, nav) = guard_for(store.clone());

        assert_eq!(
            guard.check(),
            GuardOutcome::Redirected(Some(EndReason::CorruptState))
        );
        assert!(store.access_token().is_none());
        assert!(store.refresh_token().is_none());
        assert_eq!(nav.redirects(), 1);
        assert_eq!(nav.notices(), vec![EndReason::CorruptState.notice()]);
    }

    #[test]
    fn test_incomplete_cached_profile_is_not_trusted() {
        let store = Arc::new(SessionStore::in_memory());
        store
            .save(
                &CredentialPair {
                    access_token: "A1".to_string(),
                    refresh_token: None,
                },
                &profile(1, "alice"),
            )
            .unwrap();
        store.put_raw("user", r#"{"id":1,"username":"alice"}"#);
        let (guard, nav) = guard_for(store.clone());

        assert_eq!(
            guard.check(),
            GuardOutcome::Redirected(Some(EndReason::CorruptState))
        );
        assert!(store.load().unwrap().is_none());
        assert_eq!(nav.notices(), vec![EndReason::CorruptState.notice()]);
    }

    #[test]
    fn test_unreadable_session_file_is_cleared() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("session.json");
        std::fs::write(&path, "{ truncated").unwrap();
        let store = Arc::new(SessionStore::open(&path));
        let (guard, nav) = guard_for(store);

        assert_eq!(
            guard.check(),
            GuardOutcome::Redirected(Some(EndReason::CorruptState))
        );
        assert!(!path.exists());
        assert_eq!(nav.redirects(), 1);
    }
}
