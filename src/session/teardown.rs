//! Session teardown: the single exit path out of an authenticated session

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::SessionStore;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The user logged out
    Logout,
    /// The access token was rejected and no refresh token was stored
    ValidationFailed,
    /// The access token was rejected and the refresh token was too
    RenewalFailed,
    /// Stored session data could not be decoded
    CorruptState,
}

impl EndReason {
    /// Notice shown to the user when the session ends
    pub fn notice(&self) -> &'static str {
        match self {
            EndReason::Logout => "You have been logged out.",
            EndReason::ValidationFailed => "Your session has expired. Please log in again.",
            EndReason::RenewalFailed => {
                "Your session has expired and could not be renewed. Please log in again."
            }
            EndReason::CorruptState => {
                "Stored session data was unreadable and has been cleared. Please log in again."
            }
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EndReason::Logout => "logged out",
            EndReason::ValidationFailed => {
                "access token rejected and no refresh token available"
            }
            EndReason::RenewalFailed => "access token rejected and could not be renewed",
            EndReason::CorruptState => "stored session data is corrupted",
        };
        f.write_str(text)
    }
}

/// Side effects of leaving a session: showing a notice and returning the
/// user to the unauthenticated entry point.
pub trait Navigator: Send + Sync {
    fn notify(&self, message: &str);
    fn redirect_to_entry(&self);
}

/// Clears the store and redirects, at most once per instance.
pub struct SessionTeardown {
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    redirected: AtomicBool,
}

impl SessionTeardown {
    pub fn new(store: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            store,
            navigator,
            redirected: AtomicBool::new(false),
        }
    }

    /// End the session: clear the store, show the notice, redirect.
    ///
    /// Repeated calls clear the store again but do not repeat the notice or
    /// the redirect. Returns whether this call performed the redirect.
    pub fn end_session(&self, reason: EndReason) -> bool {
        self.store.clear();

        if self.redirected.swap(true, Ordering::SeqCst) {
            log::debug!("Session already ended, ignoring {:?}", reason);
            return false;
        }

        log::info!("Session ended: {}", reason);
        self.navigator.notify(reason.notice());
        self.navigator.redirect_to_entry();
        true
    }

    /// Redirect a visitor who never had a session. No notice, no store change.
    pub fn redirect_anonymous(&self) -> bool {
        if self.redirected.swap(true, Ordering::SeqCst) {
            return false;
        }
        log::debug!("No session stored, redirecting to entry point");
        self.navigator.redirect_to_entry();
        true
    }
}

/// Navigator that records effects for assertions
#[cfg(test)]
#[derive(Default)]
pub struct RecordingNavigator {
    notices: std::sync::Mutex<Vec<String>>,
    redirects: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Navigator for RecordingNavigator {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn redirect_to_entry(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}
