//! Symlink discovery, classification, rewriting, and auditing.
//!
//! - [`scan`] walks roots and yields symlinks.
//! - [`classify`] decides whether a link is in scope for rewriting.
//! - [`rewrite`] proposes and applies verified relative targets.
//! - [`audit`] counts broken links and optionally repairs them.

pub mod audit;
pub mod classify;
pub mod resolve;
pub mod rewrite;
pub mod scan;

pub use audit::{AuditOptions, AuditReport, LinkAuditor, PrefixSubstitution};
pub use classify::{Classification, LinkCandidate, Scope};
pub use rewrite::{LinkRewriter, RewriteError, RewriteOutcome};
