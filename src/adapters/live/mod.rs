//! Live adapters for real external interactions.

pub mod filesystem;
pub mod prompt;

pub use filesystem::LiveFileSystem;
pub use prompt::TerminalPrompt;
