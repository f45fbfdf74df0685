//! Live filesystem adapter using `std::fs`.

use std::io;
use std::path::{Path, PathBuf};

use crate::ports::filesystem::LinkFileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl LinkFileSystem for LiveFileSystem {
    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::canonicalize(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        std::fs::symlink_metadata(path).is_ok_and(|meta| meta.file_type().is_symlink())
    }

    fn remove_link(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    #[cfg(unix)]
    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(not(unix))]
    fn symlink(&self, _target: &Path, link: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot create symlink {}: unsupported platform", link.display()),
        ))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn symlink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        let link = dir.path().join("link");

        let fs = LiveFileSystem;
        fs.symlink(Path::new("file.txt"), &link).unwrap();

        assert!(fs.is_symlink(&link));
        assert!(!fs.is_symlink(&file));
        assert_eq!(fs.read_link(&link).unwrap(), PathBuf::from("file.txt"));
        assert_eq!(fs.canonicalize(&link).unwrap(), fs.canonicalize(&file).unwrap());

        fs.remove_link(&link).unwrap();
        assert!(!fs.is_symlink(&link));
        assert!(file.exists());
    }

    #[test]
    fn dangling_link_does_not_exist() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("dangling");
        let fs = LiveFileSystem;
        fs.symlink(&dir.path().join("missing"), &link).unwrap();

        assert!(fs.is_symlink(&link));
        assert!(!fs.exists(&link));
        assert!(fs.canonicalize(&link).is_err());
    }
}
