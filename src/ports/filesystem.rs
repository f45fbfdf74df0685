//! Filesystem port for symlink inspection and mutation.

use std::io;
use std::path::{Path, PathBuf};

/// Provides the filesystem operations the link core needs.
///
/// Abstracting the filesystem lets tests inject failures at the exact
/// point between removing a link and recreating it.
pub trait LinkFileSystem: Send + Sync {
    /// Reads the literal target string stored in a symlink.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Resolves every symlink and relative segment in `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if any component of the path does not exist.
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Returns `true` if the path exists after following symlinks.
    fn exists(&self, path: &Path) -> bool;

    /// Returns `true` if the path itself is a symlink (not followed).
    fn is_symlink(&self, path: &Path) -> bool;

    /// Removes a symlink without touching what it points at.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be removed.
    fn remove_link(&self, path: &Path) -> io::Result<()>;

    /// Creates a symlink at `link` whose stored target is `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the link cannot be created (permissions, an entry
    /// already exists, unsupported platform).
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()>;
}
