//! Recursive discovery of symlinks beneath a set of roots.

use std::path::PathBuf;

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::classify::is_ignored;

/// Lazily yields every symlink under `roots`, skipping ignored subtrees.
///
/// Roots are walked in the order given and each directory's entries in
/// file-name order. Symlinks are reported but never followed, so a link to
/// a directory is yielded once and its contents are not walked. Entries
/// that cannot be read are skipped with a debug note.
pub fn scan<'a>(
    roots: &'a [PathBuf],
    ignores: &'a [PathBuf],
) -> impl Iterator<Item = PathBuf> + 'a {
    roots.iter().flat_map(move |root| {
        WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| {
                let keep = !is_ignored(entry.path(), ignores);
                if !keep {
                    debug!("ignoring {}", entry.path().display());
                }
                keep
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    debug!("scan skipped: {err}");
                    None
                }
            })
            .filter(|entry| entry.depth() > 0 && entry.path_is_symlink())
            .map(DirEntry::into_path)
    })
}
