//! Sign-in, registration and logout commands

use std::time::Duration;

use colored::Colorize;
use dialoguer::{Input, Password, theme::ColorfulTheme};
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::Result;
use crate::models::ProfileDisplay;
use crate::output;

/// Run the login command
pub async fn login(
    opts: &GlobalOptions,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    // Refuse before prompting for anything
    ctx.manager.ensure_signed_out()?;

    let username = match username {
        Some(username) => username,
        None => prompt_username()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .interact()?,
    };

    let spinner = spinner("Signing in...", ctx.format);
    let result = ctx.manager.sign_in(&username, &password).await;
    spinner.finish_and_clear();
    let session = result?;

    output::print(
        &ProfileDisplay::from(&session.profile),
        ctx.format,
        |profile| {
            format!(
                "{} Logged in as {}",
                "✓".green(),
                profile.username.bold()
            )
        },
    )
}

/// Run the register command
pub async fn register(
    opts: &GlobalOptions,
    username: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    ctx.manager.ensure_signed_out()?;

    let username = match username {
        Some(username) => username,
        None => prompt_username()?,
    };
    let (password, confirm) = match password {
        Some(password) => (password.clone(), password),
        None => {
            let theme = ColorfulTheme::default();
            let password = Password::with_theme(&theme)
                .with_prompt("Password")
                .interact()?;
            let confirm = Password::with_theme(&theme)
                .with_prompt("Confirm password")
                .interact()?;
            (password, confirm)
        }
    };

    let spinner = spinner("Creating account...", ctx.format);
    let result = ctx.manager.register(&username, &password, &confirm).await;
    spinner.finish_and_clear();
    result?;

    output::print(
        &json!({ "username": username, "registered": true }),
        ctx.format,
        |_| {
            format!(
                "{} Account created. Run {} to sign in.",
                "✓".green(),
                "authsession login".cyan()
            )
        },
    )
}

/// Run the logout command. Succeeds whether or not a session was stored.
pub fn logout(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let had_session = ctx.manager.store().has_session();

    ctx.manager.logout();

    if ctx.format == OutputFormat::Json {
        output::print(
            &json!({ "logged_out": true, "had_session": had_session }),
            ctx.format,
            |_| String::new(),
        )?;
    }
    Ok(())
}

fn prompt_username() -> Result<String> {
    let username: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Username")
        .interact_text()?;
    Ok(username.trim().to_string())
}

/// Spinner on stderr while waiting on the API; hidden for JSON output
fn spinner(message: &'static str, format: OutputFormat) -> ProgressBar {
    if format == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
