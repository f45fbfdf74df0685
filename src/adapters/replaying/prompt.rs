//! Replaying adapter for the `DecisionSource` port.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use crate::ports::prompt::{Decision, DecisionSource};

/// Replays a fixed sequence of decisions, one per candidate.
///
/// Once the script runs out every further candidate gets `quit`.
pub struct ScriptedDecisions {
    remaining: Mutex<VecDeque<Decision>>,
}

impl ScriptedDecisions {
    /// Creates a decision source that answers with `decisions` in order.
    #[must_use]
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self { remaining: Mutex::new(decisions.into()) }
    }

    /// Parses an answers file: a YAML list such as `[yes, no, all, quit]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a list of known decisions.
    pub fn from_yaml(content: &str) -> Result<Self, String> {
        let decisions: Vec<Decision> =
            serde_yaml::from_str(content).map_err(|e| format!("Failed to parse answers: {e}"))?;
        Ok(Self::new(decisions))
    }

    /// Number of answers not yet handed out.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.lock().expect("decision script lock poisoned").len()
    }
}

impl DecisionSource for ScriptedDecisions {
    fn decide(&self, symlink: &Path, _proposal: &Path) -> Decision {
        let next = self.remaining.lock().expect("decision script lock poisoned").pop_front();
        next.unwrap_or_else(|| {
            tracing::warn!("answers exhausted at {}; quitting", symlink.display());
            Decision::Quit
        })
    }
}
