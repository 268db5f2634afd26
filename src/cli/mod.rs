//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod args;
pub mod auth;
pub mod context;
pub mod health;
pub mod init;
pub mod navigator;
pub mod session;
pub mod status;

pub use args::OutputFormat;
pub use context::CommandContext;

/// authsession - sign in to a token-based authentication service and keep
/// the session alive from the terminal
#[derive(Parser, Debug)]
#[command(name = "authsession")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (pretty, json)
    #[arg(
        long,
        global = true,
        env = "AUTHSESSION_FORMAT",
        default_value = "pretty",
        hide_env = true,
        hide_possible_values = true
    )]
    pub format: OutputFormat,

    /// Override config file location
    #[arg(long, global = true, env = "AUTHSESSION_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Authentication API base URL (e.g. http://localhost:8000/api/v1)
    #[arg(long, global = true, env = "AUTHSESSION_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Override session file location
    #[arg(long, global = true, env = "AUTHSESSION_SESSION_FILE", hide_env = true)]
    pub session_file: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "AUTHSESSION_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file interactively
    Init,

    /// Sign in and store the session
    Login {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted when omitted)
        #[arg(long, env = "AUTHSESSION_PASSWORD", hide_env = true)]
        password: Option<String>,
    },

    /// Create a new account
    Register {
        /// Username (prompted when omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Password (prompted with confirmation when omitted)
        #[arg(long, env = "AUTHSESSION_PASSWORD", hide_env = true)]
        password: Option<String>,
    },

    /// End the session and clear stored credentials
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Validate the stored credentials once, renewing them if rejected
    Check,

    /// Validate the stored credentials periodically until stopped
    Watch {
        /// Run the first check immediately
        #[arg(long)]
        eager: bool,
    },

    /// Show Authentication API health
    Health,

    /// Show local configuration and session status
    Status,

    /// Display version information
    Version,
}
