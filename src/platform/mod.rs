//! Host integration: opening paths, asking the user, showing notices, and
//! registering the URL scheme.
//!
//! Each capability is a trait with one implementation per host family. The
//! implementation is picked at process start from the running OS, so the
//! workflow itself never branches on the platform and can be driven by a fake
//! in tests.

mod linux;
mod macos;
mod terminal;
mod utils;
mod windows;

pub use linux::{LinuxDesktop, LinuxRegistrar};
pub use macos::{MacDesktop, MacRegistrar};
pub use terminal::TerminalDesktop;
pub use windows::{WindowsDesktop, WindowsRegistrar};

use crate::config::{DialogBackend, Settings};
use crate::security::ConfirmationResult;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Title used on every dialog this tool shows.
pub(crate) const DIALOG_TITLE: &str = "ope - Confirm";

/// Desktop collaborators the workflow depends on.
pub trait Desktop: Send + Sync {
    fn name(&self) -> &'static str;

    /// Hand `path` to the host's default application and wait for the
    /// launcher to return.
    fn open(&self, path: &Path) -> Result<()>;

    /// Ask whether `path` may be opened. Blocks until the user answers;
    /// every failure of the dialog itself is reported as `Cancel`.
    fn confirm(&self, path: &Path) -> ConfirmationResult;

    /// Show an error notice. Failures are logged, never returned.
    fn notify(&self, title: &str, message: &str);
}

/// URL-scheme registration for the current user.
pub trait Registrar {
    /// Register `exe` as the handler. Returns where the registration lives.
    fn install(&self, exe: &Path) -> Result<String>;

    /// Remove the registration. Returns what was removed.
    fn uninstall(&self) -> Result<String>;
}

/// Host families with distinct open/dialog/registration mechanics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum HostOs {
    /// Linux and the BSDs: xdg-open, zenity, `.desktop` files.
    Freedesktop,
    MacOs,
    Windows,
}

impl HostOs {
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value to a host family.
    pub fn from_name(os: &str) -> Self {
        match os {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            _ => Self::Freedesktop,
        }
    }
}

/// Native desktop backend for `os`.
pub fn native_desktop(os: HostOs) -> Box<dyn Desktop> {
    match os {
        HostOs::Freedesktop => Box::new(LinuxDesktop),
        HostOs::MacOs => Box::new(MacDesktop),
        HostOs::Windows => Box::new(WindowsDesktop),
    }
}

/// Desktop backend for this process: the native one for `os`, wrapped in
/// terminal prompts when `settings` ask for them.
pub fn detect(os: HostOs, settings: &Settings) -> Box<dyn Desktop> {
    let native = native_desktop(os);
    let desktop: Box<dyn Desktop> = match settings.dialog {
        DialogBackend::Native => native,
        DialogBackend::Terminal => Box::new(TerminalDesktop::new(native)),
    };
    tracing::debug!(%os, backend = desktop.name(), "desktop backend selected");
    desktop
}

/// Scheme registrar for `os`, rooted at `home`.
pub fn registrar(os: HostOs, home: PathBuf) -> Box<dyn Registrar> {
    match os {
        HostOs::Freedesktop => Box::new(LinuxRegistrar::new(home)),
        HostOs::MacOs => Box::new(MacRegistrar::new(home)),
        HostOs::Windows => Box::new(WindowsRegistrar),
    }
}
