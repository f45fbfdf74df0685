//! Best-effort resolution of link targets that may not exist.

use std::io;
use std::path::{Path, PathBuf};

use crate::paths::normalize_lexical;
use crate::ports::filesystem::LinkFileSystem;

/// Link hops followed before giving up, matching the usual `SYMLOOP_MAX`.
const MAX_HOPS: usize = 40;

/// Resolves where `symlink` points, even when the target is missing.
///
/// Existing targets are canonicalized. For broken links the chain of
/// links is followed as far as it goes, the deepest existing ancestor of
/// the final target is canonicalized and the missing remainder is
/// appended, the way `realpath -m` reports a dangling path.
///
/// # Errors
///
/// Returns an error if a link in the chain cannot be read.
pub fn resolve_lenient(fs: &dyn LinkFileSystem, symlink: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs.canonicalize(symlink) {
        return Ok(canonical);
    }

    let mut current = symlink.to_path_buf();
    for _ in 0..MAX_HOPS {
        let stored = fs.read_link(&current)?;
        let next = match current.parent() {
            Some(dir) if stored.is_relative() => dir.join(stored),
            _ => stored,
        };
        if !fs.is_symlink(&next) {
            return Ok(canonicalize_existing_prefix(fs, &next));
        }
        current = next;
    }
    Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("too many levels of symbolic links at {}", symlink.display()),
    ))
}

fn canonicalize_existing_prefix(fs: &dyn LinkFileSystem, path: &Path) -> PathBuf {
    for ancestor in path.ancestors().skip(1) {
        if let Ok(base) = fs.canonicalize(ancestor) {
            let rest = path.strip_prefix(ancestor).unwrap_or(path);
            return normalize_lexical(&base.join(rest));
        }
    }
    normalize_lexical(path)
}
