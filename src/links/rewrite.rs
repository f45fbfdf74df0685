//! Verified replacement of absolute symlink targets with relative ones.
//!
//! A rewrite removes the old link and creates a new one in its place. The
//! two steps are not atomic: if creation fails after removal the link is
//! gone and [`RewriteError::RewriteFailed`] names the path to restore by
//! hand. Nothing is rolled back.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use super::classify::same_referent;
use crate::paths::relative_path;
use crate::ports::filesystem::LinkFileSystem;

/// Failures while proposing or applying a rewrite.
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The link's directory could not be resolved to build a proposal.
    #[error("cannot compute a relative path for {symlink}: {source}")]
    Unresolvable {
        /// The link being examined.
        symlink: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// The replacement is absolute; callers must only pass relative paths.
    #[error("refusing to rewrite {symlink}: replacement {replacement} is not relative")]
    UnsafeRewrite {
        /// The link being rewritten.
        symlink: PathBuf,
        /// The rejected replacement.
        replacement: PathBuf,
    },
    /// The replacement would make the link resolve to a different file.
    #[error("refusing to rewrite {symlink}: {replacement} does not reach the current target")]
    TargetMismatch {
        /// The link being rewritten.
        symlink: PathBuf,
        /// The rejected replacement.
        replacement: PathBuf,
    },
    /// The old link could not be removed; it is unchanged.
    #[error("cannot remove {symlink}: {source}")]
    RemoveFailed {
        /// The link that was left in place.
        symlink: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// The old link was removed but the new one could not be created.
    #[error("failed to relink {symlink} -> {replacement}; {symlink} is now missing: {source}")]
    RewriteFailed {
        /// The path now left without a link.
        symlink: PathBuf,
        /// The target the new link should have had.
        replacement: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
}

impl RewriteError {
    /// Returns `true` if the filesystem was changed before the failure,
    /// meaning the link needs manual repair.
    #[must_use]
    pub fn touched_filesystem(&self) -> bool {
        matches!(self, Self::RewriteFailed { .. })
    }
}

/// What a successful [`LinkRewriter::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The link now stores the relative path.
    Rewritten,
    /// Verification passed; nothing was changed because of dry-run mode.
    DryRun,
}

/// Computes and applies relative replacements for absolute symlinks.
pub struct LinkRewriter<'a> {
    fs: &'a dyn LinkFileSystem,
    dry_run: bool,
}

impl<'a> LinkRewriter<'a> {
    /// Creates a rewriter; with `dry_run` set, [`apply`](Self::apply) only verifies.
    #[must_use]
    pub fn new(fs: &'a dyn LinkFileSystem, dry_run: bool) -> Self {
        Self { fs, dry_run }
    }

    /// Computes the path from the symlink's directory to `target`.
    ///
    /// The directory is canonicalized first, because a relative link is
    /// resolved against the physical directory holding it.
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError::Unresolvable`] if the directory or target
    /// cannot be canonicalized.
    pub fn propose(&self, symlink: &Path, target: &Path) -> Result<PathBuf, RewriteError> {
        let unresolvable =
            |source: io::Error| RewriteError::Unresolvable { symlink: symlink.to_path_buf(), source };
        let dir = symlink.parent().ok_or_else(|| {
            unresolvable(io::Error::new(io::ErrorKind::InvalidInput, "link has no parent directory"))
        })?;
        let dir = self.fs.canonicalize(dir).map_err(unresolvable)?;
        let target = self.fs.canonicalize(target).map_err(unresolvable)?;
        Ok(relative_path(&target, &dir))
    }

    /// Replaces the stored target of `symlink` with `replacement`.
    ///
    /// # Errors
    ///
    /// - [`RewriteError::UnsafeRewrite`] if `replacement` is absolute.
    /// - [`RewriteError::TargetMismatch`] if `replacement` would not reach the
    ///   file the link currently resolves to.
    /// - [`RewriteError::RemoveFailed`] if the old link cannot be removed.
    /// - [`RewriteError::RewriteFailed`] if the new link cannot be created
    ///   after the old one was removed.
    pub fn apply(
        &self,
        symlink: &Path,
        replacement: &Path,
    ) -> Result<RewriteOutcome, RewriteError> {
        if replacement.is_absolute() {
            return Err(RewriteError::UnsafeRewrite {
                symlink: symlink.to_path_buf(),
                replacement: replacement.to_path_buf(),
            });
        }
        if !same_referent(self.fs, symlink, replacement, symlink) {
            return Err(RewriteError::TargetMismatch {
                symlink: symlink.to_path_buf(),
                replacement: replacement.to_path_buf(),
            });
        }

        info!("ln -sf {} {}", replacement.display(), symlink.display());
        if self.dry_run {
            return Ok(RewriteOutcome::DryRun);
        }

        self.fs
            .remove_link(symlink)
            .map_err(|source| RewriteError::RemoveFailed { symlink: symlink.to_path_buf(), source })?;
        self.fs.symlink(replacement, symlink).map_err(|source| RewriteError::RewriteFailed {
            symlink: symlink.to_path_buf(),
            replacement: replacement.to_path_buf(),
            source,
        })?;
        Ok(RewriteOutcome::Rewritten)
    }
}
