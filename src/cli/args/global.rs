//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer; config file values are merged in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (pretty, json)
    pub format: OutputFormat,

    /// Custom config file path (defaults to ~/.authsession/config.yaml)
    pub config: Option<String>,

    /// API base URL override
    pub api_url: Option<String>,

    /// Session file override
    pub session_file: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            config: cli.config.clone(),
            api_url: cli.api_url.clone(),
            session_file: cli.session_file.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}
