use super::store::default_config_path;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

/// Which confirmation/notice backend to drive.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DialogBackend {
    /// Host-native dialogs selected by OS detection.
    #[default]
    Native,
    /// Prompts on the controlling terminal.
    Terminal,
}

/// Process-level settings. Unlike [`super::Policy`] these are never persisted;
/// they come from built-in locations and `OPE_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config_path: Option<PathBuf>,
    pub dialog: DialogBackend,
    pub log_level: Option<Level>,
}

impl Settings {
    pub fn load() -> Self {
        let mut settings = Self {
            config_path: default_config_path(),
            ..Self::default()
        };
        settings.apply_env_overrides();
        settings
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("OPE_CONFIG")
            && !path.is_empty()
        {
            self.config_path = Some(PathBuf::from(path));
        }

        if let Ok(dialog) = std::env::var("OPE_DIALOG") {
            match DialogBackend::from_str(dialog.trim()) {
                Ok(backend) => self.dialog = backend,
                Err(_) => tracing::warn!(value = %dialog, "ignoring unknown OPE_DIALOG"),
            }
        }

        if let Ok(level) = std::env::var("OPE_LOG")
            && let Ok(level) = Level::from_str(level.trim())
        {
            self.log_level = Some(level);
        }
    }
}
