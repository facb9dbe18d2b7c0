//! Turns a scheme URI into a local filesystem path.
//!
//! Resolution is two steps: [`parse_uri`] strips the scheme and authority and
//! percent-decodes the remainder, then [`expand_path`] applies `~` and glob
//! expansion and cleans the result. Neither step requires the final path to
//! exist; the workflow checks that separately.

mod expand;
mod uri;

pub use expand::{clean_path, expand_path, has_glob_meta};
pub use uri::parse_uri;

use crate::error::ResolveError;
use directories::BaseDirs;
use std::path::{Path, PathBuf};

/// Scheme this handler is registered for.
pub const SCHEME: &str = "ope";

/// Scheme name plus the home directory used for `~` expansion.
#[derive(Debug, Clone)]
pub struct Resolver {
    scheme: String,
    home: Option<PathBuf>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(SCHEME)
    }
}

impl Resolver {
    /// Resolver for `scheme`, with the current user's home directory.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            home: BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf()),
        }
    }

    /// Replace the home directory; `None` makes `~` paths fail to resolve.
    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn home(&self) -> Option<&Path> {
        self.home.as_deref()
    }

    pub fn resolve(&self, raw: &str) -> Result<PathBuf, ResolveError> {
        let path = parse_uri(raw, &self.scheme)?;
        tracing::debug!(%raw, %path, "parsed uri");
        expand_path(&path, self.home.as_deref())
    }
}
