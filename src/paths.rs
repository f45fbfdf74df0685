//! Command-line path normalization.
//!
//! Turns raw path arguments into absolute roots and ignore roots: `~` is
//! expanded to the home directory, `$VAR`/`${VAR}` to environment values,
//! and the result is made absolute and normalized. Arguments that start
//! with [`IGNORE_MARKER`] name subtrees to skip.

use std::env;
use std::path::{Component, Path, PathBuf};

/// Prefix marking a positional argument as an ignore root.
pub const IGNORE_MARKER: char = '^';

/// Absolute roots and ignore roots, in argument order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathArgs {
    /// Directories to scan.
    pub roots: Vec<PathBuf>,
    /// Subtrees excluded from scanning.
    pub ignores: Vec<PathBuf>,
}

/// Splits positional arguments into roots and ignore roots.
///
/// `extra_ignores` come from `--ignore` flags and carry no marker. When
/// every argument is an ignore root the result has no roots, and a run
/// over it has nothing to do.
#[must_use]
pub fn split_arguments(args: &[String], extra_ignores: &[String]) -> PathArgs {
    let mut parsed = PathArgs::default();
    for arg in args {
        match arg.strip_prefix(IGNORE_MARKER) {
            Some(ignored) => parsed.ignores.push(resolve_existing(&expand_path(ignored))),
            None => parsed.roots.push(resolve_existing(&expand_path(arg))),
        }
    }
    parsed.ignores.extend(extra_ignores.iter().map(|raw| resolve_existing(&expand_path(raw))));
    parsed
}

/// Expands `~` and environment variables, then makes the path absolute.
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf());
    let expanded = expand_vars_with(&expand_user_with(raw, home.as_deref()), |name| {
        env::var(name).ok()
    });
    absolutize(Path::new(&expanded))
}

/// Replaces a leading `~` or `~/` with `home`.
///
/// `~user` forms and a missing home directory leave the input unchanged.
#[must_use]
pub fn expand_user_with(raw: &str, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return raw.to_string();
    };
    if raw == "~" {
        return home.to_string_lossy().into_owned();
    }
    match raw.strip_prefix("~/") {
        Some(rest) => home.join(rest).to_string_lossy().into_owned(),
        None => raw.to_string(),
    }
}

/// Substitutes `$NAME` and `${NAME}` using `lookup`.
///
/// References to unset variables are left as written.
#[must_use]
pub fn expand_vars_with(raw: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };

        match (name.is_empty(), lookup(name)) {
            (false, Some(value)) => out.push_str(&value),
            _ => out.push_str(&rest[pos..=pos + consumed]),
        }
        rest = &rest[pos + 1 + consumed..];
    }
    out.push_str(rest);
    out
}

/// Joins a relative path onto the current directory and normalizes it.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return normalize_lexical(path);
    }
    let joined = env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path));
    normalize_lexical(&joined)
}

/// Canonicalizes a path that exists; keeps the lexical form otherwise.
#[must_use]
pub fn resolve_existing(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize_lexical(path))
}

/// Resolves `.` and `..` components without consulting the filesystem.
#[must_use]
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(segment) => out.push(segment),
            Component::RootDir | Component::Prefix(_) => out.push(component.as_os_str()),
        }
    }
    out
}

/// Builds the path that leads from directory `base` to `target`.
///
/// Both inputs are expected to be absolute and normalized. Equal inputs
/// yield `.`.
#[must_use]
pub fn relative_path(target: &Path, base: &Path) -> PathBuf {
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let base_parts: Vec<Component<'_>> = base.components().collect();
    let shared =
        target_parts.iter().zip(&base_parts).take_while(|(left, right)| left == right).count();

    let mut relative = PathBuf::new();
    for _ in shared..base_parts.len() {
        relative.push("..");
    }
    for part in &target_parts[shared..] {
        relative.push(part.as_os_str());
    }
    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}
