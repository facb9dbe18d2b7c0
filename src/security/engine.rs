use crate::config::Policy;
use std::path::Path;

/// Outcome of evaluating a path against the [`Policy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Decision {
    Allow,
    Block,
    Ask,
}

/// Decide whether `path` may be opened without asking.
///
/// Blocked patterns are scanned first, then allowed ones; the first match in
/// list order wins. A path matching neither list is allowed if it is an
/// existing directory and needs confirmation otherwise.
pub fn decide(path: &Path, policy: &Policy) -> Decision {
    evaluate(&base_name(path), || path.is_dir(), policy)
}

/// [`decide`] with the directory fact supplied by the caller.
pub fn decide_with(base: &str, is_dir: bool, policy: &Policy) -> Decision {
    evaluate(base, || is_dir, policy)
}

fn evaluate(base: &str, is_dir: impl FnOnce() -> bool, policy: &Policy) -> Decision {
    let base = base.to_lowercase();

    if let Some(pattern) = first_match(&policy.blocked, &base) {
        tracing::debug!(%base, %pattern, "matched blocked pattern");
        return Decision::Block;
    }
    if let Some(pattern) = first_match(&policy.allowed, &base) {
        tracing::debug!(%base, %pattern, "matched allowed pattern");
        return Decision::Allow;
    }
    if is_dir() {
        return Decision::Allow;
    }
    Decision::Ask
}

fn first_match<'a>(patterns: &'a [String], base: &str) -> Option<&'a str> {
    patterns
        .iter()
        .map(String::as_str)
        .find(|pattern| pattern_matches(pattern, base))
}

/// Case-insensitive shell glob match of `pattern` against a base name.
///
/// A pattern equal to the name also matches, so a remembered name such as
/// `report[1].pdf` keeps matching itself. Malformed globs otherwise never match.
pub fn pattern_matches(pattern: &str, base: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let base = base.to_lowercase();
    if pattern == base {
        return true;
    }
    glob::Pattern::new(&pattern).is_ok_and(|compiled| compiled.matches(&base))
}

/// Final path segment, or the whole path when it has none (e.g. `/`).
pub fn base_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.to_string_lossy().into_owned(),
        |name| name.to_string_lossy().into_owned(),
    )
}
