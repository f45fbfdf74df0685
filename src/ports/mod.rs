//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the link-fixing core and the
//! outside world (the filesystem, the person answering prompts).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod prompt;

pub use filesystem::LinkFileSystem;
pub use prompt::{Decision, DecisionSource};
