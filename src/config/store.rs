use super::Policy;
use crate::error::ConfigError;
use directories::BaseDirs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Source and sink for the persisted [`Policy`].
///
/// A store is consulted once per resolution: `load` before deciding and at
/// most one `save` after a remembered choice. There is no locking between
/// `load` and `save`; two concurrent resolutions against the same backing
/// data race, and the last writer wins.
pub trait PolicyStore: Send + Sync {
    fn load(&self) -> Result<Policy, ConfigError>;

    fn save(&self, policy: &Policy) -> Result<(), ConfigError>;

    /// Human-readable location, used by `ope config`.
    fn describe(&self) -> String;
}

/// `<user config dir>/ope/ope.toml`, or `None` if the platform exposes no
/// per-user config directory.
pub fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("ope").join("ope.toml"))
}

/// TOML policy file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: Option<PathBuf>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A store with nowhere to persist: loads yield defaults, saves fail.
    pub fn unlocated() -> Self {
        Self { path: None }
    }

    pub fn from_path(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl PolicyStore for FileStore {
    fn load(&self) -> Result<Policy, ConfigError> {
        let Some(path) = &self.path else {
            tracing::debug!("no config location; using built-in policy");
            return Ok(Policy::default());
        };

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "policy file absent; using defaults");
                return Ok(Policy::default());
            }
            Err(error) => {
                return Err(ConfigError::Read {
                    path: path.clone(),
                    error,
                });
            }
        };

        Policy::from_toml(&contents).map_err(|e| ConfigError::Load {
            path: path.clone(),
            message: e.to_string().trim().to_string(),
        })
    }

    fn save(&self, policy: &Policy) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NoLocation)?;
        let contents = policy.to_toml()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| ConfigError::Save {
                path: parent.to_path_buf(),
                error,
            })?;
        }

        fs::write(path, contents).map_err(|error| ConfigError::Save {
            path: path.clone(),
            error,
        })?;
        tracing::debug!(path = %path.display(), "policy saved");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.as_ref().map_or_else(
            || "(no config directory)".to_string(),
            |p| p.display().to_string(),
        )
    }
}

/// In-memory store. Clones share the same backing policy, which makes it
/// possible to model two invocations racing on one config file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    policy: Mutex<Option<Policy>>,
    fail_saves: bool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Empty backing: loads yield [`Policy::default`] until something is saved.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: Policy) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                policy: Mutex::new(Some(policy)),
                ..MemoryInner::default()
            }),
        }
    }

    /// Every `save` fails with [`ConfigError::Save`]; the backing never changes.
    pub fn failing_saves(policy: Policy) -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                policy: Mutex::new(Some(policy)),
                fail_saves: true,
                saves: AtomicUsize::new(0),
            }),
        }
    }

    /// Currently persisted policy, if any was seeded or saved.
    pub fn snapshot(&self) -> Option<Policy> {
        self.inner
            .policy
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.inner.saves.load(Ordering::SeqCst)
    }
}

impl PolicyStore for MemoryStore {
    fn load(&self) -> Result<Policy, ConfigError> {
        Ok(self.snapshot().unwrap_or_default())
    }

    fn save(&self, policy: &Policy) -> Result<(), ConfigError> {
        if self.inner.fail_saves {
            return Err(ConfigError::Save {
                path: PathBuf::from("<memory>"),
                error: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only store"),
            });
        }
        *self
            .inner
            .policy
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(policy.clone());
        self.inner.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
