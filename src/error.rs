use std::path::PathBuf;
use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `ope`.
///
/// Each stage of a resolution defines its own variant. The workflow returns
/// these so callers can tell a user cancellation apart from a policy block;
/// the binary's glue code converts them into `anyhow::Error` for reporting.
#[derive(Debug, Error)]
pub enum OpeError {
    // ── URI parsing / path expansion ─────────────────────────────────────
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    // ── Config ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Config(#[from] ConfigError),

    // ── Policy / confirmation ────────────────────────────────────────────
    #[error("blocked by security policy: {name}")]
    PolicyBlocked { name: String },

    #[error("cancelled")]
    UserCancelled,

    // ── Platform collaborators ───────────────────────────────────────────
    #[error("failed to open {}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("registration: {0}")]
    Registration(String),
}

impl OpeError {
    /// Message plus every underlying cause, `: `-separated.
    pub fn chain_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }

    /// Short title shown on the notice dialog for this error.
    pub fn notice_title(&self) -> &'static str {
        match self {
            Self::Resolve(ResolveError::InvalidUri(_) | ResolveError::UnsupportedScheme(_)) => {
                "Invalid URL"
            }
            Self::Resolve(_) => "Path Error",
            Self::PathNotFound(_) => "Not Found",
            Self::Config(_) => "Config Error",
            Self::PolicyBlocked { .. } => "Blocked",
            Self::UserCancelled => "Cancelled",
            Self::OpenFailed { .. } => "Open Failed",
            Self::Registration(_) => "Install Error",
        }
    }
}

// ─── Resolution errors ───────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid URL: {0}")]
    InvalidUri(String),

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("cannot expand ~: home directory is unknown")]
    HomeResolution,

    #[error("no files matched: {0}")]
    NoMatch(String),

    #[error("invalid glob pattern: {0}")]
    InvalidPattern(String),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("failed to read {}: {error}", path.display())]
    Read { path: PathBuf, error: std::io::Error },

    #[error("failed to write {}: {error}", path.display())]
    Save { path: PathBuf, error: std::io::Error },

    #[error("failed to serialize policy: {0}")]
    Serialize(String),

    #[error("no per-user config directory available")]
    NoLocation,
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, OpeError>;
