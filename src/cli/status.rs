//! Status command implementation
//!
//! Local view only: no API calls, and no token values are ever printed.

use colored::Colorize;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::config::Config;
use crate::error::Result;
use crate::output;
use crate::session::SessionStore;

/// Stored session state as reported by `status`
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case", tag = "state")]
enum SessionState {
    SignedIn { username: String, refresh_token: bool },
    SignedOut,
    Unreadable { detail: String },
}

#[derive(Debug, Serialize)]
struct StatusReport {
    config_file: String,
    config_found: bool,
    api_url: String,
    session_file: String,
    check_interval_secs: u64,
    refresh_policy: String,
    session: SessionState,
}

/// Run the status command to display configuration and session status
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let config_path = Config::resolve_path(opts.config_ref())?;
    let config = CommandContext::load_config(opts)?;
    let session_path = config.session_path()?;

    // Read-only: nothing in the session file is cleared here
    let session = match SessionStore::open(&session_path).peek() {
        Ok(Some(session)) => SessionState::SignedIn {
            username: session.profile.username,
            refresh_token: session.credentials.refresh_token.is_some(),
        },
        Ok(None) => SessionState::SignedOut,
        Err(e) => SessionState::Unreadable {
            detail: e.to_string(),
        },
    };

    let report = StatusReport {
        config_file: config_path.display().to_string(),
        config_found: config_path.exists(),
        api_url: config.api_url(),
        session_file: session_path.display().to_string(),
        check_interval_secs: config.check_interval_secs,
        refresh_policy: config.refresh_policy.to_string(),
        session,
    };

    if opts.format == OutputFormat::Json {
        return output::print(&report, opts.format, |_| String::new());
    }

    print_pretty(&report);
    Ok(())
}

fn print_pretty(report: &StatusReport) {
    println!("{}\n", "authsession Status".bold());

    if report.config_found {
        println!("Config file: {}", report.config_file.cyan());
    } else {
        println!(
            "Config file: {} {}",
            report.config_file.cyan(),
            "(not found, using defaults)".dimmed()
        );
    }
    println!("API URL: {}", report.api_url.cyan());
    println!("Session file: {}", report.session_file.cyan());
    println!(
        "Check interval: {}s, refresh policy: {}",
        report.check_interval_secs, report.refresh_policy
    );
    println!();

    match &report.session {
        SessionState::SignedIn {
            username,
            refresh_token,
        } => {
            println!("{} Signed in as {}", "✓".green(), username.bold());
            if *refresh_token {
                println!("{} Refresh token stored", "✓".green());
            } else {
                println!(
                    "{} No refresh token (session ends at the first rejected check)",
                    "○".dimmed()
                );
            }
        }
        SessionState::SignedOut => {
            println!("{} Not signed in", "○".dimmed());
            println!("  → Run 'authsession login' to sign in");
        }
        SessionState::Unreadable { detail } => {
            println!("{} Stored session is unreadable: {}", "⚠".yellow(), detail);
            println!("  → It will be cleared by the next protected command");
        }
    }

    println!();
}
