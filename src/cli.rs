//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

/// Parser for `symfix`, which rewrites absolute symlinks as relative ones.
#[derive(Debug, Parser)]
#[command(
    name = "symfix",
    version,
    about = "Rewrite absolute symlinks under each root as relative links",
    after_help = "Prefix a PATH with '^' to ignore that subtree instead of scanning it."
)]
pub struct FixCli {
    /// Root directories to scan (`^PATH` marks an ignored subtree).
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Subtree to ignore; may be repeated.
    #[arg(short, long = "ignore", value_name = "PATH")]
    pub ignore: Vec<String>,

    /// Rewrite every candidate without asking.
    #[arg(short, long)]
    pub yes: bool,

    /// Verify and report rewrites without changing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Read answers from a YAML list instead of the terminal.
    #[arg(long, value_name = "FILE", conflicts_with = "yes")]
    pub answers: Option<PathBuf>,

    /// Increase diagnostic output (repeat for more).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parser for `resym`, which audits a tree for broken symlinks.
#[derive(Debug, Parser)]
#[command(name = "resym", version, about = "Count broken symlinks under a directory")]
pub struct AuditCli {
    /// Directory to audit.
    #[arg(value_name = "ROOT")]
    pub root: String,

    /// Stale target prefix to replace when repairing broken links.
    #[arg(long, value_name = "OLD", requires = "relink_to")]
    pub relink_from: Option<String>,

    /// Replacement prefix; a broken link is relinked only if the result exists.
    #[arg(long, value_name = "NEW", requires = "relink_from")]
    pub relink_to: Option<String>,

    /// Report repairs without relinking.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Increase diagnostic output (repeat for more).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
