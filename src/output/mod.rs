//! Output formatting for CLI results

use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

/// Print data to stdout: JSON in the metadata envelope, or the pretty
/// rendering produced by `pretty`.
pub fn print<T, F>(data: &T, format: OutputFormat, pretty: F) -> Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    let output = match format {
        OutputFormat::Json => json::format_json(data)?,
        OutputFormat::Pretty => pretty(data),
    };
    println!("{}", output);
    Ok(())
}
