//! Core library for the `symfix` and `resym` CLIs.
//!
//! `symfix` finds absolute symlinks whose targets live under the same root
//! and rewrites them as relative links, after checking that the new link
//! reaches the same file. `resym` audits a tree for broken links.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod driver;
pub mod links;
pub mod logging;
pub mod paths;
pub mod ports;

use clap::error::ErrorKind;
use clap::Parser;

/// Run the fix CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or the answers file
/// is unusable.
pub fn run_fix<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::FixCli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return informational(err),
    };
    logging::init(cli.verbose);
    commands::fix::run(&cli)
}

/// Run the audit CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails.
pub fn run_audit<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::AuditCli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) => return informational(err),
    };
    logging::init(cli.verbose);
    commands::audit::run(&cli)
}

/// Prints `--help`/`--version` output and succeeds; other parse errors fail.
fn informational(err: clap::Error) -> Result<(), String> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            err.print().map_err(|e| format!("Failed to write help: {e}"))
        }
        _ => Err(err.to_string()),
    }
}
