//! Command handlers for the `symfix` and `resym` binaries.

pub mod audit;
pub mod fix;

use std::path::PathBuf;

/// Formats a path list as `[/a, /b]`.
fn format_paths(paths: &[PathBuf]) -> String {
    let joined: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", joined.join(", "))
}
