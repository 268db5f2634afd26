//! Command execution context
//!
//! Loads configuration, applies CLI overrides and wires the API client and
//! session manager for command handlers.

use std::sync::Arc;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::navigator::TerminalNavigator;
use crate::client::GatewayClient;
use crate::config::Config;
use crate::error::{Result, SessionError};
use crate::session::{GuardOutcome, Session, SessionManager, SessionStore};

/// Context for command execution containing config, client, and session
/// manager.
pub struct CommandContext {
    /// Loaded configuration with CLI overrides applied
    pub config: Config,
    /// Authentication API client
    pub client: Arc<GatewayClient>,
    /// Session lifecycle for this process
    pub manager: SessionManager,
    /// Output format preference
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// # Errors
    /// Returns error if the config cannot be loaded or is invalid, or the
    /// HTTP client cannot be built.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::load_config(opts)?;

        let client = Arc::new(GatewayClient::new(
            &config.api_url(),
            config.request_timeout(),
        )?);
        let store = Arc::new(SessionStore::open(config.session_path()?));
        let manager = SessionManager::new(
            client.clone(),
            store,
            Arc::new(TerminalNavigator),
            config.refresh_policy,
            config.check_interval(),
        );

        log::debug!(
            "Using API {} and session file {}",
            config.api_url(),
            manager.store().location()
        );

        Ok(Self {
            config,
            client,
            manager,
            format: opts.format,
        })
    }

    /// Load the config file and layer the CLI/env overrides on top
    pub fn load_config(opts: &GlobalOptions) -> Result<Config> {
        let mut config = Config::load_at(opts.config_ref())?;

        if let Some(url) = &opts.api_url {
            config.api_url = Some(url.clone());
        }
        if let Some(path) = &opts.session_file {
            config.session_file = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Run the session guard for a protected command.
    ///
    /// # Errors
    /// `SessionError::NoSession` when nothing is stored, or
    /// `SessionError::Ended` when a stored session had to be destroyed.
    pub fn require_session(&self) -> Result<Session> {
        match self.manager.guard() {
            GuardOutcome::Admitted(session) => Ok(session),
            GuardOutcome::Redirected(None) => Err(SessionError::NoSession.into()),
            GuardOutcome::Redirected(Some(reason)) => Err(SessionError::Ended(reason).into()),
        }
    }
}
