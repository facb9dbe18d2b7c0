use crate::error::ResolveError;
use std::path::{Component, Path, PathBuf};

const GLOB_META: &[char] = &['*', '?', '['];

/// Expand a decoded URI path into a clean, absolute filesystem path.
///
/// - a leading `~` is replaced by `home` (`~foo` becomes `<home>/foo`)
/// - if the path contains `*`, `?` or `[`, it is globbed against the
///   filesystem and the first match is taken. Matches are ordered by byte-wise
///   comparison of file names at each directory level, so `B.txt` sorts before
///   `a.txt`.
/// - relative results are anchored at the current directory
/// - `.` and `..` are resolved lexically; the path need not exist
pub fn expand_path(path: &str, home: Option<&Path>) -> Result<PathBuf, ResolveError> {
    let mut expanded = match path.strip_prefix('~') {
        Some(rest) => {
            let home = home.ok_or(ResolveError::HomeResolution)?;
            home.join(rest.trim_start_matches(['/', '\\']))
        }
        None => PathBuf::from(path),
    };

    if has_glob_meta(&expanded) {
        expanded = first_glob_match(&expanded)?;
    }

    if expanded.is_relative()
        && let Ok(cwd) = std::env::current_dir()
    {
        expanded = cwd.join(expanded);
    }

    Ok(clean_path(&expanded))
}

pub fn has_glob_meta(path: &Path) -> bool {
    path.to_string_lossy().contains(GLOB_META)
}

fn first_glob_match(pattern: &Path) -> Result<PathBuf, ResolveError> {
    let pattern = pattern.to_string_lossy();
    let entries = glob::glob(&pattern)
        .map_err(|e| ResolveError::InvalidPattern(format!("{pattern}: {e}")))?;

    for entry in entries {
        match entry {
            Ok(path) => {
                tracing::debug!(%pattern, matched = %path.display(), "glob expanded");
                return Ok(path);
            }
            Err(error) => {
                tracing::debug!(%pattern, %error, "skipping unreadable glob entry");
            }
        }
    }

    Err(ResolveError::NoMatch(pattern.into_owned()))
}

/// Lexical normalization: drops `.`, folds `..` into its parent, collapses
/// repeated separators, and never climbs above the root. An empty result is
/// `.`.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => parts.push(component),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}
