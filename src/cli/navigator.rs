//! Terminal side effects of leaving a session

use colored::Colorize;

use crate::session::Navigator;

/// Prints session notices to stderr and points the user back at `login`.
///
/// In a terminal the unauthenticated entry point is the `login` command, so
/// "redirecting" means telling the user to run it.
#[derive(Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn notify(&self, message: &str) {
        eprintln!("{}", message.yellow().bold());
    }

    fn redirect_to_entry(&self) {
        eprintln!("  → Run {} to sign in", "authsession login".cyan());
    }
}
