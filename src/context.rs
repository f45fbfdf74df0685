//! Service context bundling all port trait objects.

use std::path::Path;

use crate::adapters::live::{LiveFileSystem, TerminalPrompt};
use crate::adapters::replaying::ScriptedDecisions;
use crate::ports::filesystem::LinkFileSystem;
use crate::ports::prompt::{Decision, DecisionSource};

/// Bundles all port trait objects into a single context.
///
/// Constructors wire up different adapter implementations; the filesystem
/// is always live, the decision source is interactive or scripted.
pub struct ServiceContext {
    /// Filesystem for link inspection and mutation.
    pub fs: Box<dyn LinkFileSystem>,
    /// Source of per-candidate decisions.
    pub prompt: Box<dyn DecisionSource>,
}

impl ServiceContext {
    /// Creates a live context that asks on the terminal.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Box::new(LiveFileSystem), prompt: Box::new(TerminalPrompt::stdio()) }
    }

    /// Creates a context whose answers come from `decisions`, in order.
    #[must_use]
    pub fn scripted(decisions: Vec<Decision>) -> Self {
        Self { fs: Box::new(LiveFileSystem), prompt: Box::new(ScriptedDecisions::new(decisions)) }
    }

    /// Creates a scripted context from a YAML answers file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_answers_file(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read answers file {}: {e}", path.display()))?;
        let script = ScriptedDecisions::from_yaml(&content)
            .map_err(|e| format!("{e} (in {})", path.display()))?;
        tracing::debug!("loaded {} answers from {}", script.remaining(), path.display());
        Ok(Self { fs: Box::new(LiveFileSystem), prompt: Box::new(script) })
    }
}
