//! Session store: the only code that knows the persisted key layout

use std::collections::BTreeMap;
use std::path::PathBuf;

#[cfg(test)]
use super::backend::MemoryBackend;
use super::backend::{FileBackend, StorageBackend, WriteOp};
use super::{CredentialPair, Session};
use crate::client::models::UserProfile;
use crate::error::{Result, SessionError};

const TOKEN_KEY: &str = "token";
const REFRESH_TOKEN_KEY: &str = "refresh_token";
const USER_KEY: &str = "user";

/// How a token replacement treats the stored refresh token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshUpdate {
    Keep,
    Replace(String),
    Remove,
}

/// Persisted session state.
///
/// A profile is never stored without an access token: `save` writes both in
/// one batch, `clear` removes both in one batch, and the partial updates
/// refuse to run when no session is stored.
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store kept in process memory
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Store backed by a session file
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBackend::new(path))
    }

    pub fn location(&self) -> String {
        self.backend.location()
    }

    /// Persist a credential pair and its profile together
    pub fn save(&self, pair: &CredentialPair, profile: &UserProfile) -> Result<()> {
        let user = serde_json::to_string(profile)?;
        let refresh = match &pair.refresh_token {
            Some(token) => WriteOp::Set(REFRESH_TOKEN_KEY, token.clone()),
            None => WriteOp::Remove(REFRESH_TOKEN_KEY),
        };
        self.backend.apply(vec![
            WriteOp::Set(TOKEN_KEY, pair.access_token.clone()),
            refresh,
            WriteOp::Set(USER_KEY, user),
        ])
    }

    /// Load the current session.
    ///
    /// Returns `Ok(None)` when no access token is stored and
    /// `SessionError::CorruptProfile` when a token exists but the profile is
    /// missing or undecodable. A stray profile without a token is removed.
    pub fn load(&self) -> Result<Option<Session>> {
        let entries = self.backend.snapshot()?;
        if !entries.contains_key(TOKEN_KEY) && entries.contains_key(USER_KEY) {
            log::warn!("Found a cached profile without credentials, discarding it");
            self.clear();
        }
        decode_session(entries)
    }

    /// Same as `load`, but never writes to storage
    pub fn peek(&self) -> Result<Option<Session>> {
        decode_session(self.backend.snapshot()?)
    }

    /// Current access token, read from storage on every call
    pub fn access_token(&self) -> Option<String> {
        self.read_or_warn(TOKEN_KEY)
    }

    /// Current refresh token, read from storage on every call
    pub fn refresh_token(&self) -> Option<String> {
        self.read_or_warn(REFRESH_TOKEN_KEY)
    }

    /// Whether an access token is stored
    pub fn has_session(&self) -> bool {
        self.access_token().is_some()
    }

    /// Swap in a renewed access token.
    ///
    /// Fails with `SessionError::NoSession` if the session was cleared in the
    /// meantime, so a late renewal cannot store tokens without a profile.
    pub fn replace_tokens(&self, access_token: String, refresh: RefreshUpdate) -> Result<()> {
        if self.backend.get(USER_KEY)?.is_none() {
            return Err(SessionError::NoSession.into());
        }

        let mut ops = vec![WriteOp::Set(TOKEN_KEY, access_token)];
        match refresh {
            RefreshUpdate::Keep => {}
            RefreshUpdate::Replace(token) => ops.push(WriteOp::Set(REFRESH_TOKEN_KEY, token)),
            RefreshUpdate::Remove => ops.push(WriteOp::Remove(REFRESH_TOKEN_KEY)),
        }
        self.backend.apply(ops)
    }

    /// Replace the cached profile of the stored session
    pub fn update_profile(&self, profile: &UserProfile) -> Result<()> {
        if self.backend.get(TOKEN_KEY)?.is_none() {
            return Err(SessionError::NoSession.into());
        }
        let user = serde_json::to_string(profile)?;
        self.backend.apply(vec![WriteOp::Set(USER_KEY, user)])
    }

    /// Remove every session entry. Never fails; storage errors are logged.
    pub fn clear(&self) {
        let result = self.backend.apply(vec![
            WriteOp::Remove(TOKEN_KEY),
            WriteOp::Remove(REFRESH_TOKEN_KEY),
            WriteOp::Remove(USER_KEY),
        ]);
        if let Err(e) = result {
            log::warn!("Failed to clear session storage at {}: {}", self.location(), e);
        }
    }

    fn read_or_warn(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {} from session storage: {}", key, e);
                None
            }
        }
    }

    /// Write a raw entry, bypassing the invariants (for corruption tests)
    #[cfg(test)]
    pub fn put_raw(&self, key: &'static str, value: &str) {
        self.backend
            .apply(vec![WriteOp::Set(key, value.to_string())])
            .unwrap();
    }
}

/// Build a session from one consistent set of entries
fn decode_session(mut entries: BTreeMap<String, String>) -> Result<Option<Session>> {
    let Some(access_token) = entries.remove(TOKEN_KEY) else {
        return Ok(None);
    };
    let refresh_token = entries.remove(REFRESH_TOKEN_KEY);

    let raw = entries
        .remove(USER_KEY)
        .ok_or_else(|| SessionError::CorruptProfile("profile entry is missing".into()))?;
    let profile: UserProfile =
        serde_json::from_str(&raw).map_err(|e| SessionError::CorruptProfile(e.to_string()))?;

    Ok(Some(Session {
        credentials: CredentialPair {
            access_token,
            refresh_token,
        },
        profile,
    }))
}
