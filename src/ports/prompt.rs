//! Decision port for per-candidate confirmation.

use std::path::Path;

use serde::Deserialize;

/// The answer given for a single rewrite candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Apply this rewrite.
    #[serde(alias = "y")]
    Yes,
    /// Apply this rewrite and every later one without asking.
    #[serde(alias = "all", alias = "a")]
    YesToAll,
    /// Leave this link alone.
    #[serde(alias = "n")]
    No,
    /// Stop processing; later candidates are left untouched.
    #[serde(alias = "q")]
    Quit,
}

impl Decision {
    /// Parses a typed answer the way the interactive prompt does.
    ///
    /// Empty input means `yes`. Otherwise only the first character counts,
    /// case-insensitively. Surrounding whitespace is trimmed first, so
    /// `" n"` reads as `no`. Returns `None` for anything unrecognized.
    #[must_use]
    pub fn from_answer(answer: &str) -> Option<Self> {
        let Some(first) = answer.trim().chars().next() else {
            return Some(Self::Yes);
        };
        match first.to_ascii_lowercase() {
            'y' => Some(Self::Yes),
            'a' => Some(Self::YesToAll),
            'n' => Some(Self::No),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Supplies a decision for each proposed rewrite.
///
/// The interactive terminal is one source; a scripted answer list is another,
/// which keeps the driver deterministic under test.
pub trait DecisionSource: Send + Sync {
    /// Asks whether `symlink` should be rewritten to point at `proposal`.
    fn decide(&self, symlink: &Path, proposal: &Path) -> Decision;
}
