//! Protected commands: whoami, check, watch
//!
//! Each runs the session guard first and renders nothing when it redirects.

use chrono::Local;
use colored::Colorize;
use tokio::sync::mpsc;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::{Result, SessionError};
use crate::models::{CycleDisplay, ProfileDisplay};
use crate::output::json::JsonOutput;
use crate::output::{self, table::format_record};
use crate::session::{CycleOutcome, CycleReport, ValidatorState};

/// Run the whoami command
pub fn whoami(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let session = ctx.require_session()?;

    output::print(
        &ProfileDisplay::from(&session.profile),
        ctx.format,
        format_record::<ProfileDisplay>,
    )
}

/// Run the check command: one eager validation cycle
pub async fn check(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let session = ctx.require_session()?;

    let outcome = ctx.manager.check_now().await;
    let display = CycleDisplay::new(outcome, Local::now());

    match outcome {
        // The notice has already been shown on stderr
        CycleOutcome::Ended(reason) => {
            if ctx.format == OutputFormat::Json {
                output::print(&display, ctx.format, CycleDisplay::summary)?;
            }
            Err(SessionError::Ended(reason).into())
        }
        _ => output::print(&display, ctx.format, |d| {
            format!(
                "{} {} ({})",
                "✓".green(),
                d.summary(),
                session.profile.username.bold()
            )
        }),
    }
}

/// Run the watch command until the session ends or Ctrl-C
pub async fn watch(opts: &GlobalOptions, eager: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let session = ctx.require_session()?;

    let (reports_tx, mut reports) = mpsc::unbounded_channel();
    let handle = ctx
        .manager
        .schedule()
        .eager(eager)
        .with_reporter(reports_tx)
        .spawn();

    if ctx.format == OutputFormat::Pretty {
        println!(
            "Watching session for {} every {}s (Ctrl-C to stop)",
            session.profile.username.bold(),
            ctx.config.check_interval_secs
        );
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            report = reports.recv() => match report {
                Some(report) => print_report(&report, ctx.format)?,
                // The schedule stops only when the session ends
                None => break,
            },
            _ = &mut ctrl_c => {
                if ctx.manager.validator_state() == ValidatorState::Checking {
                    log::debug!("Interrupted, abandoning the in-flight check");
                } else {
                    log::debug!("Interrupted, stopping validation");
                }
                handle.cancel();
                break;
            }
        }
    }

    match handle.join().await {
        Some(reason) => Err(SessionError::Ended(reason).into()),
        None => Ok(()),
    }
}

/// One line per cycle; JSON output is one envelope per line
fn print_report(report: &CycleReport, format: OutputFormat) -> Result<()> {
    let display = CycleDisplay::new(report.outcome, report.finished_at);
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&JsonOutput::new(&display))?);
        }
        OutputFormat::Pretty => {
            let stamp = report.finished_at.format("%H:%M:%S").to_string();
            let summary = match report.outcome {
                CycleOutcome::Valid => display.summary().green(),
                CycleOutcome::Renewed => display.summary().cyan(),
                CycleOutcome::Ended(_) => display.summary().red(),
                CycleOutcome::AlreadyChecking => display.summary().dimmed(),
            };
            println!("[{}] {}", stamp.dimmed(), summary);
        }
    }
    Ok(())
}
