//! Init command implementation

use colored::Colorize;
use dialoguer::{Input, Select, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::config::Config;
use crate::error::Result;
use crate::session::RefreshPolicy;

/// Run the init command: prompt for each setting, starting from the current
/// file (or defaults) and save the result.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    let theme = ColorfulTheme::default();
    let mut config = Config::load_at(opts.config_ref()).unwrap_or_default();

    println!("{}", "Welcome to authsession!".bold().green());
    println!("Let's set up your configuration.\n");

    let api_url: String = Input::with_theme(&theme)
        .with_prompt("Authentication API URL")
        .default(opts.api_url.clone().unwrap_or_else(|| config.api_url()))
        .interact_text()?;
    config.api_url = Some(api_url.trim().to_string());

    config.check_interval_secs = Input::with_theme(&theme)
        .with_prompt("Seconds between credential checks")
        .default(config.check_interval_secs)
        .validate_with(|secs: &u64| {
            if *secs > 0 {
                Ok(())
            } else {
                Err("must be greater than zero")
            }
        })
        .interact_text()?;

    let policies = [RefreshPolicy::Retain, RefreshPolicy::Rotate];
    let labels = [
        "retain - keep the refresh token when the server does not issue a new one",
        "rotate - refresh tokens are single-use",
    ];
    let current = policies
        .iter()
        .position(|p| *p == config.refresh_policy)
        .unwrap_or(0);
    let selection = Select::with_theme(&theme)
        .with_prompt("Refresh token policy")
        .items(&labels[..])
        .default(current)
        .interact()?;
    config.refresh_policy = policies[selection];

    config.validate()?;
    config.save_at(opts.config_ref())?;

    let config_path = Config::resolve_path(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        config_path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Sign in", "authsession login".cyan());
    println!("  {} - Check the API", "authsession health".cyan());

    Ok(())
}
