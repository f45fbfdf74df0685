//! Decides which symlinks are safe to rewrite.
//!
//! All prefix tests here compare whole path components, so an ignore root
//! or root at `/home/a` never claims `/home/ab`.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ports::filesystem::LinkFileSystem;

/// The roots a run is confined to and the subtrees it must skip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// Absolute directories under which links may be rewritten.
    pub roots: Vec<PathBuf>,
    /// Absolute directories whose contents are never considered.
    pub ignores: Vec<PathBuf>,
}

impl Scope {
    /// Creates a scope from roots and ignore roots.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, ignores: Vec<PathBuf>) -> Self {
        Self { roots, ignores }
    }
}

/// A symlink whose absolute target lies under the same root as the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkCandidate {
    /// Absolute path of the symlink itself.
    pub symlink: PathBuf,
    /// Canonical path of the file the link resolves to.
    pub target: PathBuf,
    /// The first root containing both the link and its target.
    pub root: PathBuf,
}

/// Why a symlink was or was not accepted as a rewrite candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The link lies under an ignore root.
    Ignored,
    /// The path is not a symlink, or its stored target cannot be read.
    NotALink,
    /// The stored target is already relative.
    AlreadyRelative,
    /// The target does not exist.
    Dangling,
    /// No single root holds both the link and its target.
    OutOfScope {
        /// Canonical path of the target.
        target: PathBuf,
    },
    /// The link is safe to rewrite.
    Candidate(LinkCandidate),
}

/// Returns `true` if `path` equals or lies beneath any of `ignore_roots`.
#[must_use]
pub fn is_ignored(path: &Path, ignore_roots: &[PathBuf]) -> bool {
    ignore_roots.iter().any(|ignore_root| path.starts_with(ignore_root))
}

/// Returns the first root that contains both `symlink` and `target`.
#[must_use]
pub fn owning_root<'a>(symlink: &Path, target: &Path, roots: &'a [PathBuf]) -> Option<&'a Path> {
    roots
        .iter()
        .find(|root| symlink.starts_with(root) && target.starts_with(root))
        .map(PathBuf::as_path)
}

/// Classifies a discovered symlink against `scope`.
pub fn classify(fs: &dyn LinkFileSystem, symlink: &Path, scope: &Scope) -> Classification {
    if is_ignored(symlink, &scope.ignores) {
        debug!("ignoring {}", symlink.display());
        return Classification::Ignored;
    }

    let stored = match fs.read_link(symlink) {
        Ok(stored) => stored,
        Err(err) => {
            debug!("skipping {}: {err}", symlink.display());
            return Classification::NotALink;
        }
    };
    if !stored.is_absolute() {
        return Classification::AlreadyRelative;
    }

    let Ok(target) = fs.canonicalize(symlink) else {
        return Classification::Dangling;
    };
    if !target.is_absolute() || !fs.exists(&target) {
        return Classification::Dangling;
    }

    match owning_root(symlink, &target, &scope.roots) {
        Some(root) => Classification::Candidate(LinkCandidate {
            symlink: symlink.to_path_buf(),
            target,
            root: root.to_path_buf(),
        }),
        None => Classification::OutOfScope { target },
    }
}

/// Returns `true` if `symlink` is an in-scope rewrite candidate.
#[must_use]
pub fn is_in_scope(fs: &dyn LinkFileSystem, symlink: &Path, scope: &Scope) -> bool {
    matches!(classify(fs, symlink, scope), Classification::Candidate(_))
}

/// Checks that `proposal`, read relative to the link's directory, reaches
/// the same canonical file as `original_target`.
///
/// `original_target` may be the symlink itself; it is canonicalized too.
#[must_use]
pub fn same_referent(
    fs: &dyn LinkFileSystem,
    symlink: &Path,
    proposal: &Path,
    original_target: &Path,
) -> bool {
    let Some(dir) = symlink.parent() else {
        return false;
    };
    let (Ok(proposed), Ok(original)) =
        (fs.canonicalize(&dir.join(proposal)), fs.canonicalize(original_target))
    else {
        debug!("cannot resolve {} or {}", proposal.display(), original_target.display());
        return false;
    };
    if proposed != original {
        debug!("{} != {}", proposed.display(), original.display());
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(items: &[&str]) -> Vec<PathBuf> {
        items.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn ignore_matches_root_itself_and_descendants() {
        let ignores = paths(&["/home/a"]);
        assert!(is_ignored(Path::new("/home/a"), &ignores));
        assert!(is_ignored(Path::new("/home/a/x/y"), &ignores));
    }

    #[test]
    fn ignore_respects_segment_boundaries() {
        let ignores = paths(&["/home/a"]);
        assert!(!is_ignored(Path::new("/home/ab"), &ignores));
        assert!(!is_ignored(Path::new("/home/ab/file"), &ignores));
    }

    #[test]
    fn every_ignore_root_is_checked() {
        let ignores = paths(&["/first", "/second", "/third"]);
        assert!(is_ignored(Path::new("/third/x"), &ignores));
        assert!(!is_ignored(Path::new("/fourth/x"), &ignores));
    }

    #[test]
    fn root_membership_respects_segment_boundaries() {
        let roots = paths(&["/home/alice"]);
        assert_eq!(owning_root(Path::new("/home/alice/l"), Path::new("/home/alice2/x"), &roots), None);
        assert_eq!(
            owning_root(Path::new("/home/alice/l"), Path::new("/home/alice/x"), &roots),
            Some(Path::new("/home/alice"))
        );
    }

    #[test]
    fn owning_root_requires_link_and_target_in_same_root() {
        let roots = paths(&["/r1", "/r2"]);
        assert_eq!(owning_root(Path::new("/r1/l"), Path::new("/r2/f"), &roots), None);
        assert_eq!(owning_root(Path::new("/r2/l"), Path::new("/r2/f"), &roots), Some(Path::new("/r2")));
    }

    #[cfg(unix)]
    mod on_disk {
        use super::super::*;
        use crate::adapters::live::LiveFileSystem;
        use std::os::unix::fs::symlink;

        fn fixture() -> (tempfile::TempDir, PathBuf) {
            let dir = tempfile::tempdir().unwrap();
            let root = std::fs::canonicalize(dir.path()).unwrap();
            std::fs::create_dir_all(root.join("a")).unwrap();
            std::fs::create_dir_all(root.join("b")).unwrap();
            std::fs::write(root.join("b/file"), "data").unwrap();
            (dir, root)
        }

        #[test]
        fn absolute_link_inside_root_is_candidate() {
            let (_dir, root) = fixture();
            let link = root.join("a/link");
            symlink(root.join("b/file"), &link).unwrap();
            let scope = Scope::new(vec![root.clone()], Vec::new());

            let Classification::Candidate(candidate) = classify(&LiveFileSystem, &link, &scope)
            else {
                panic!("expected a candidate");
            };
            assert_eq!(candidate.target, root.join("b/file"));
            assert_eq!(candidate.root, root);
            assert!(is_in_scope(&LiveFileSystem, &link, &scope));
        }

        #[test]
        fn relative_link_is_left_alone() {
            let (_dir, root) = fixture();
            let link = root.join("a/link");
            symlink("../b/file", &link).unwrap();
            let scope = Scope::new(vec![root], Vec::new());

            assert_eq!(classify(&LiveFileSystem, &link, &scope), Classification::AlreadyRelative);
        }

        #[test]
        fn dangling_link_is_rejected() {
            let (_dir, root) = fixture();
            let link = root.join("a/link");
            symlink(root.join("b/missing"), &link).unwrap();
            let scope = Scope::new(vec![root], Vec::new());

            assert_eq!(classify(&LiveFileSystem, &link, &scope), Classification::Dangling);
        }

        #[test]
        fn ignored_link_is_rejected_before_anything_else() {
            let (_dir, root) = fixture();
            let link = root.join("a/link");
            symlink(root.join("b/file"), &link).unwrap();
            let scope = Scope::new(vec![root.clone()], vec![root.join("a")]);

            assert_eq!(classify(&LiveFileSystem, &link, &scope), Classification::Ignored);
        }

        #[test]
        fn target_outside_root_is_out_of_scope() {
            let (_dir, root) = fixture();
            let outside = tempfile::tempdir().unwrap();
            let outside_file = std::fs::canonicalize(outside.path()).unwrap().join("file");
            std::fs::write(&outside_file, "x").unwrap();
            let link = root.join("a/link");
            symlink(&outside_file, &link).unwrap();
            let scope = Scope::new(vec![root], Vec::new());

            assert_eq!(
                classify(&LiveFileSystem, &link, &scope),
                Classification::OutOfScope { target: outside_file }
            );
        }

        #[test]
        fn same_referent_accepts_equivalent_relative_path() {
            let (_dir, root) = fixture();
            let link = root.join("a/link");
            symlink(root.join("b/file"), &link).unwrap();

            assert!(same_referent(&LiveFileSystem, &link, Path::new("../b/file"), &link));
        }

        #[test]
        fn same_referent_rejects_other_file() {
            let (_dir, root) = fixture();
            std::fs::write(root.join("a/file"), "other").unwrap();
            let link = root.join("a/link");
            symlink(root.join("b/file"), &link).unwrap();

            assert!(!same_referent(&LiveFileSystem, &link, Path::new("file"), &link));
            assert!(!same_referent(&LiveFileSystem, &link, Path::new("missing"), &link));
        }
    }
}
