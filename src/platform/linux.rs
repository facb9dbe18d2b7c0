use super::utils::{capture_stdout, run_checked};
use super::{DIALOG_TITLE, Desktop, Registrar};
use crate::resolver::SCHEME;
use crate::security::ConfirmationResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const DESKTOP_FILE: &str = "ope.desktop";

/// xdg-open for opening, zenity for dialogs, notify-send as the notice fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxDesktop;

impl Desktop for LinuxDesktop {
    fn name(&self) -> &'static str {
        "freedesktop"
    }

    fn open(&self, path: &Path) -> Result<()> {
        run_checked(Command::new("xdg-open").arg(path))
    }

    fn confirm(&self, path: &Path) -> ConfirmationResult {
        let chosen = capture_stdout(
            Command::new("zenity")
                .arg("--list")
                .arg(format!("--title={DIALOG_TITLE}"))
                .arg(format!("--text=Open this path?\n\n{}", path.display()))
                .args(["--column=Action", "Allow Once", "Always Allow", "Block"]),
        );
        match chosen {
            Ok(label) => ConfirmationResult::from_label(&label),
            Err(error) => {
                tracing::debug!(%error, "zenity confirmation did not complete");
                ConfirmationResult::Cancel
            }
        }
    }

    fn notify(&self, title: &str, message: &str) {
        let zenity = run_checked(
            Command::new("zenity")
                .arg("--error")
                .arg(format!("--title={title}"))
                .arg(format!("--text={message}")),
        );
        if zenity.is_ok() {
            return;
        }
        if let Err(error) =
            run_checked(Command::new("notify-send").args(["-u", "critical", title, message]))
        {
            tracing::warn!(%error, %title, "could not display notice");
        }
    }
}

/// Registers the scheme through a hidden `.desktop` entry.
#[derive(Debug, Clone)]
pub struct LinuxRegistrar {
    home: PathBuf,
    refresh_handlers: bool,
}

impl LinuxRegistrar {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            refresh_handlers: true,
        }
    }

    /// Skip the `xdg-mime`/`update-desktop-database` calls, which act on the
    /// real user session rather than `home`.
    #[must_use]
    pub fn without_handler_refresh(mut self) -> Self {
        self.refresh_handlers = false;
        self
    }

    pub fn applications_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("applications")
    }

    pub fn desktop_file(&self) -> PathBuf {
        self.applications_dir().join(DESKTOP_FILE)
    }
}

impl Registrar for LinuxRegistrar {
    fn install(&self, exe: &Path) -> Result<String> {
        let dir = self.applications_dir();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        let file = self.desktop_file();
        fs::write(&file, desktop_entry(exe))
            .with_context(|| format!("Failed to write {}", file.display()))?;

        if self.refresh_handlers {
            let mime = format!("x-scheme-handler/{SCHEME}");
            if let Err(error) =
                run_checked(Command::new("xdg-mime").args(["default", DESKTOP_FILE, mime.as_str()]))
            {
                tracing::warn!(%error, "xdg-mime did not accept the handler");
            }
            if let Err(error) = run_checked(Command::new("update-desktop-database").arg(&dir)) {
                tracing::debug!(%error, "update-desktop-database unavailable");
            }
        }

        Ok(file.display().to_string())
    }

    fn uninstall(&self) -> Result<String> {
        let file = self.desktop_file();
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(error).with_context(|| format!("Failed to remove {}", file.display()));
            }
        }
        Ok(file.display().to_string())
    }
}

fn desktop_entry(exe: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=Ope\n\
         Exec={exec} %u\n\
         Icon=ope\n\
         Terminal=false\n\
         Categories=Utility;\n\
         MimeType=x-scheme-handler/{SCHEME};\n\
         NoDisplay=true\n",
        exec = quote_exec_arg(&exe.display().to_string()),
    )
}

/// Quote an `Exec=` argument per the desktop entry spec when it needs it.
fn quote_exec_arg(arg: &str) -> String {
    const RESERVED: &[char] = &[
        ' ', '\t', '"', '\'', '\\', '>', '<', '~', '|', '&', ';', '$', '*', '?', '#', '(', ')', '`',
    ];
    if !arg.contains(RESERVED) {
        return arg.to_string();
    }
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for ch in arg.chars() {
        if matches!(ch, '"' | '`' | '$' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
