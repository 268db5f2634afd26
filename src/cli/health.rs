//! Health command implementation

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::client::HealthApi;
use crate::error::Result;
use crate::models::HealthDisplay;
use crate::output::{self, table::format_record};

/// Run the health command. An unreachable API is shown as `error`, not
/// reported as a failure.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let display = HealthDisplay::from(ctx.client.health().await);
    output::print(&display, ctx.format, format_record::<HealthDisplay>)
}
