use super::utils::{applescript_escape, capture_stdout, run_checked, xml_escape};
use super::{DIALOG_TITLE, Desktop, Registrar};
use crate::resolver::SCHEME;
use crate::security::ConfirmationResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const BUNDLE_ID: &str = "li.blem.ope";
const LSREGISTER: &str = "/System/Library/Frameworks/CoreServices.framework/Frameworks/LaunchServices.framework/Support/lsregister";

/// `open` for opening, `osascript` dialogs for everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct MacDesktop;

impl Desktop for MacDesktop {
    fn name(&self) -> &'static str {
        "macos"
    }

    fn open(&self, path: &Path) -> Result<()> {
        run_checked(Command::new("open").arg(path))
    }

    fn confirm(&self, path: &Path) -> ConfirmationResult {
        let script = confirm_script(path);
        match capture_stdout(Command::new("osascript").args(["-e", script.as_str()])) {
            Ok(label) => ConfirmationResult::from_label(&label),
            Err(error) => {
                tracing::debug!(%error, "osascript confirmation did not complete");
                ConfirmationResult::Cancel
            }
        }
    }

    fn notify(&self, title: &str, message: &str) {
        let script = format!(
            r#"display dialog "{}" with title "{}" buttons {{"OK"}} default button "OK" with icon stop"#,
            applescript_escape(message),
            applescript_escape(title),
        );
        if let Err(error) = run_checked(Command::new("osascript").args(["-e", script.as_str()])) {
            tracing::warn!(%error, %title, "could not display notice");
        }
    }
}

fn confirm_script(path: &Path) -> String {
    format!(
        r#"display dialog "Open this path?\n\n{path}" with title "{title}" buttons {{"Block", "Always Allow", "Allow Once"}} default button "Allow Once" with icon caution"#,
        path = applescript_escape(&path.display().to_string()),
        title = applescript_escape(DIALOG_TITLE),
    )
}

/// Registers the scheme through a background-only app bundle in
/// `~/Applications`.
#[derive(Debug, Clone)]
pub struct MacRegistrar {
    home: PathBuf,
    refresh_launch_services: bool,
}

impl MacRegistrar {
    pub fn new(home: PathBuf) -> Self {
        Self {
            home,
            refresh_launch_services: true,
        }
    }

    /// Skip `lsregister`, which acts on the real user session.
    #[must_use]
    pub fn without_launch_services(mut self) -> Self {
        self.refresh_launch_services = false;
        self
    }

    pub fn app_dir(&self) -> PathBuf {
        self.home.join("Applications").join("Ope.app")
    }
}

impl Registrar for MacRegistrar {
    fn install(&self, exe: &Path) -> Result<String> {
        let exe = fs::canonicalize(exe).unwrap_or_else(|_| exe.to_path_buf());
        let app_dir = self.app_dir();
        let contents = app_dir.join("Contents");
        let macos_dir = contents.join("MacOS");
        let resources_dir = contents.join("Resources");

        for dir in [&macos_dir, &resources_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let binary = macos_dir.join("ope");
        fs::copy(&exe, &binary)
            .with_context(|| format!("Failed to copy {} into the bundle", exe.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&binary, fs::Permissions::from_mode(0o755))
                .with_context(|| format!("Failed to mark {} executable", binary.display()))?;
        }

        let plist = contents.join("Info.plist");
        fs::write(&plist, info_plist(env!("CARGO_PKG_VERSION")))
            .with_context(|| format!("Failed to write {}", plist.display()))?;

        if self.refresh_launch_services
            && let Err(error) = run_checked(Command::new(LSREGISTER).arg("-R").arg(&app_dir))
        {
            tracing::warn!(%error, "lsregister did not accept the bundle");
        }

        Ok(app_dir.display().to_string())
    }

    fn uninstall(&self) -> Result<String> {
        let app_dir = self.app_dir();
        if app_dir.exists() {
            fs::remove_dir_all(&app_dir)
                .with_context(|| format!("Failed to remove {}", app_dir.display()))?;
        }
        Ok(app_dir.display().to_string())
    }
}

fn info_plist(version: &str) -> String {
    let version = xml_escape(version);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
  <key>CFBundleIdentifier</key>
  <string>{BUNDLE_ID}</string>
  <key>CFBundleName</key>
  <string>Ope</string>
  <key>CFBundleDisplayName</key>
  <string>Ope</string>
  <key>CFBundleVersion</key>
  <string>{version}</string>
  <key>CFBundleShortVersionString</key>
  <string>{version}</string>
  <key>CFBundleExecutable</key>
  <string>ope</string>
  <key>CFBundleIconFile</key>
  <string>icon</string>
  <key>CFBundlePackageType</key>
  <string>APPL</string>
  <key>LSBackgroundOnly</key>
  <true/>
  <key>CFBundleURLTypes</key>
  <array>
    <dict>
      <key>CFBundleURLName</key>
      <string>{BUNDLE_ID}</string>
      <key>CFBundleURLSchemes</key>
      <array>
        <string>{SCHEME}</string>
      </array>
    </dict>
  </array>
</dict>
</plist>
"#
    )
}
