//! Replaying adapters that serve pre-recorded answers.

pub mod prompt;

pub use prompt::ScriptedDecisions;
