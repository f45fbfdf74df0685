//! Read-only link audit with optional prefix-substitution repair.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::resolve::resolve_lenient;
use super::scan::scan;
use crate::ports::filesystem::LinkFileSystem;

/// Replaces one leading path prefix with another, e.g. after a home
/// directory was renamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixSubstitution {
    /// Prefix found in stale targets.
    pub from: PathBuf,
    /// Prefix to put in its place.
    pub to: PathBuf,
}

impl PrefixSubstitution {
    /// Creates a substitution of `from` by `to`.
    #[must_use]
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self { from: from.into(), to: to.into() }
    }

    /// Rewrites `path` if it starts with `from`, comparing whole components.
    #[must_use]
    pub fn apply(&self, path: &Path) -> Option<PathBuf> {
        let rest = path.strip_prefix(&self.from).ok()?;
        if rest.as_os_str().is_empty() {
            Some(self.to.clone())
        } else {
            Some(self.to.join(rest))
        }
    }
}

/// Settings for an audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditOptions {
    /// Repair broken links whose substituted target exists.
    pub relink: Option<PrefixSubstitution>,
    /// Report repairs without performing them.
    pub dry_run: bool,
}

/// A link whose target does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenLink {
    /// The symlink.
    pub symlink: PathBuf,
    /// Where it resolves to, as far as that can be determined.
    pub target: PathBuf,
}

/// A broken link pointed at its substituted target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepairedLink {
    /// The symlink.
    pub symlink: PathBuf,
    /// The missing target it used to have.
    pub old_target: PathBuf,
    /// The existing target it now has (or would have, in dry-run mode).
    pub new_target: PathBuf,
    /// `false` when the relink was only reported.
    pub applied: bool,
}

/// Counters and findings from one audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Symlinks examined.
    pub total: usize,
    /// Symlinks whose target did not exist when examined.
    pub bad: usize,
    /// Every broken link, in scan order.
    pub broken: Vec<BrokenLink>,
    /// Broken links that were repaired by prefix substitution.
    pub repaired: Vec<RepairedLink>,
}

impl AuditReport {
    /// Share of broken links as a percentage; 0 when no links were found.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent_bad(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        100.0 * self.bad as f64 / self.total as f64
    }

    /// The closing line, e.g. `Total 1/3 links bad (33.33%)`.
    #[must_use]
    pub fn summary_line(&self) -> String {
        let mut line =
            format!("Total {}/{} links bad ({:.2}%)", self.bad, self.total, self.percent_bad());
        if self.total == 0 {
            line.push_str(": no links found");
        }
        line
    }
}

/// Walks trees and counts broken symlinks.
pub struct LinkAuditor<'a> {
    fs: &'a dyn LinkFileSystem,
    options: AuditOptions,
}

impl<'a> LinkAuditor<'a> {
    /// Creates an auditor using `fs` for every inspection and repair.
    #[must_use]
    pub fn new(fs: &'a dyn LinkFileSystem, options: AuditOptions) -> Self {
        Self { fs, options }
    }

    /// Examines every symlink under `roots`, skipping `ignores`.
    #[must_use]
    pub fn audit(&self, roots: &[PathBuf], ignores: &[PathBuf]) -> AuditReport {
        let mut report = AuditReport::default();
        for symlink in scan(roots, ignores) {
            report.total += 1;
            if self.fs.exists(&symlink) {
                continue;
            }
            report.bad += 1;

            let target = resolve_lenient(self.fs, &symlink).unwrap_or_else(|err| {
                debug!("cannot resolve {}: {err}", symlink.display());
                self.fs.read_link(&symlink).unwrap_or_default()
            });
            if let Some(repaired) = self.try_repair(&symlink, &target) {
                report.repaired.push(repaired);
            }
            report.broken.push(BrokenLink { symlink, target });
        }
        report
    }

    /// Relinks `symlink` to the substituted target when that target exists.
    ///
    /// Relink failures are logged and swallowed. If the old link was
    /// removed but the new one could not be created, the warning says the
    /// link is now missing.
    fn try_repair(&self, symlink: &Path, target: &Path) -> Option<RepairedLink> {
        let substitution = self.options.relink.as_ref()?;
        let new_target = substitution.apply(target)?;
        if !self.fs.exists(&new_target) {
            debug!("no replacement for {} at {}", symlink.display(), new_target.display());
            return None;
        }

        let applied = !self.options.dry_run;
        if applied {
            if let Err(err) = self.fs.remove_link(symlink) {
                warn!("error re-linking {}: {err}", symlink.display());
                return None;
            }
            if let Err(err) = self.fs.symlink(&new_target, symlink) {
                warn!(
                    "error re-linking {} -> {}; {} is now missing: {err}",
                    symlink.display(),
                    new_target.display(),
                    symlink.display()
                );
                return None;
            }
            info!("relinked {} -> {}", symlink.display(), new_target.display());
        }
        Some(RepairedLink {
            symlink: symlink.to_path_buf(),
            old_target: target.to_path_buf(),
            new_target,
            applied,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(total: usize, bad: usize) -> AuditReport {
        AuditReport { total, bad, ..AuditReport::default() }
    }

    #[test]
    fn summary_with_no_links_does_not_divide_by_zero() {
        let report = report(0, 0);
        assert!((report.percent_bad() - 0.0).abs() < f64::EPSILON);
        assert_eq!(report.summary_line(), "Total 0/0 links bad (0.00%): no links found");
    }

    #[test]
    fn summary_rounds_to_two_decimals() {
        assert_eq!(report(3, 1).summary_line(), "Total 1/3 links bad (33.33%)");
        assert_eq!(report(4, 4).summary_line(), "Total 4/4 links bad (100.00%)");
    }

    #[test]
    fn substitution_matches_whole_components() {
        let sub = PrefixSubstitution::new("/Users/old", "/Users/new");
        assert_eq!(sub.apply(Path::new("/Users/old/doc")), Some(PathBuf::from("/Users/new/doc")));
        assert_eq!(sub.apply(Path::new("/Users/old")), Some(PathBuf::from("/Users/new")));
        assert_eq!(sub.apply(Path::new("/Users/older/doc")), None);
        assert_eq!(sub.apply(Path::new("/elsewhere/Users/old")), None);
    }

    #[cfg(unix)]
    mod on_disk {
        use super::super::*;
        use crate::adapters::live::LiveFileSystem;
        use std::io;
        use std::os::unix::fs::symlink;

        /// Live filesystem whose link creation always fails.
        struct FailingSymlinkFs;

        impl LinkFileSystem for FailingSymlinkFs {
            fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
                LiveFileSystem.read_link(path)
            }
            fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
                LiveFileSystem.canonicalize(path)
            }
            fn exists(&self, path: &Path) -> bool {
                LiveFileSystem.exists(path)
            }
            fn is_symlink(&self, path: &Path) -> bool {
                LiveFileSystem.is_symlink(path)
            }
            fn remove_link(&self, path: &Path) -> io::Result<()> {
                LiveFileSystem.remove_link(path)
            }
            fn symlink(&self, _target: &Path, _link: &Path) -> io::Result<()> {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
            }
        }

        fn root() -> (tempfile::TempDir, PathBuf) {
            let dir = tempfile::tempdir().unwrap();
            let root = std::fs::canonicalize(dir.path()).unwrap();
            (dir, root)
        }

        #[test]
        fn counts_broken_links() {
            let (_dir, root) = root();
            std::fs::write(root.join("file"), "x").unwrap();
            symlink(root.join("file"), root.join("good")).unwrap();
            symlink("file", root.join("good_relative")).unwrap();
            symlink(root.join("missing"), root.join("bad")).unwrap();

            let auditor = LinkAuditor::new(&LiveFileSystem, AuditOptions::default());
            let report = auditor.audit(&[root.clone()], &[]);

            assert_eq!(report.total, 3);
            assert_eq!(report.bad, 1);
            assert_eq!(
                report.broken,
                vec![BrokenLink { symlink: root.join("bad"), target: root.join("missing") }]
            );
            assert_eq!(report.summary_line(), "Total 1/3 links bad (33.33%)");
        }

        #[test]
        fn empty_tree_reports_zero() {
            let (_dir, root) = root();
            let auditor = LinkAuditor::new(&LiveFileSystem, AuditOptions::default());
            let report = auditor.audit(&[root], &[]);
            assert_eq!(report.total, 0);
            assert!(report.summary_line().contains("0/0"));
        }

        #[test]
        fn repairs_when_substituted_target_exists() {
            let (_dir, root) = root();
            std::fs::create_dir_all(root.join("new")).unwrap();
            std::fs::write(root.join("new/doc"), "x").unwrap();
            symlink(root.join("old/doc"), root.join("link")).unwrap();

            let options = AuditOptions {
                relink: Some(PrefixSubstitution::new(root.join("old"), root.join("new"))),
                dry_run: false,
            };
            let report = LinkAuditor::new(&LiveFileSystem, options).audit(&[root.clone()], &[]);

            assert_eq!(report.bad, 1);
            assert_eq!(report.repaired.len(), 1);
            assert!(report.repaired[0].applied);
            assert_eq!(report.repaired[0].old_target, root.join("old/doc"));
            assert_eq!(std::fs::read_link(root.join("link")).unwrap(), root.join("new/doc"));
        }

        #[test]
        fn leaves_link_when_substituted_target_is_missing() {
            let (_dir, root) = root();
            symlink(root.join("old/doc"), root.join("link")).unwrap();

            let options = AuditOptions {
                relink: Some(PrefixSubstitution::new(root.join("old"), root.join("new"))),
                dry_run: false,
            };
            let report = LinkAuditor::new(&LiveFileSystem, options).audit(&[root.clone()], &[]);

            assert_eq!(report.bad, 1);
            assert!(report.repaired.is_empty());
            assert_eq!(std::fs::read_link(root.join("link")).unwrap(), root.join("old/doc"));
        }

        #[test]
        fn failed_relink_is_swallowed_and_not_reported_as_repaired() {
            let (_dir, root) = root();
            std::fs::create_dir_all(root.join("new")).unwrap();
            std::fs::write(root.join("new/doc"), "x").unwrap();
            symlink(root.join("old/doc"), root.join("link")).unwrap();

            let options = AuditOptions {
                relink: Some(PrefixSubstitution::new(root.join("old"), root.join("new"))),
                dry_run: false,
            };
            let report = LinkAuditor::new(&FailingSymlinkFs, options).audit(&[root.clone()], &[]);

            assert_eq!(report.total, 1);
            assert_eq!(report.bad, 1);
            assert!(report.repaired.is_empty());
            assert_eq!(report.broken.len(), 1);
            assert!(std::fs::symlink_metadata(root.join("link")).is_err());
        }

        #[test]
        fn dry_run_reports_repair_without_relinking() {
            let (_dir, root) = root();
            std::fs::create_dir_all(root.join("new")).unwrap();
            std::fs::write(root.join("new/doc"), "x").unwrap();
            symlink(root.join("old/doc"), root.join("link")).unwrap();

            let options = AuditOptions {
                relink: Some(PrefixSubstitution::new(root.join("old"), root.join("new"))),
                dry_run: true,
            };
            let report = LinkAuditor::new(&LiveFileSystem, options).audit(&[root.clone()], &[]);

            assert_eq!(report.repaired.len(), 1);
            assert!(!report.repaired[0].applied);
            assert_eq!(std::fs::read_link(root.join("link")).unwrap(), root.join("old/doc"));
        }
    }
}
