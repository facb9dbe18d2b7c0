use super::utils::{capture_stdout, powershell_escape, run_checked};
use super::{DIALOG_TITLE, Desktop, Registrar};
use crate::resolver::SCHEME;
use crate::security::ConfirmationResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const LAUNCHER: &str = "ope-launcher.vbs";

/// Explorer/`start` for opening, PowerShell WinForms for dialogs.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsDesktop;

impl Desktop for WindowsDesktop {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn open(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            // explorer.exe exits non-zero even when the window opened.
            Command::new("explorer")
                .arg(path)
                .status()
                .context("Failed to spawn explorer")?;
            return Ok(());
        }
        run_checked(Command::new("cmd").args(["/c", "start", ""]).arg(path))
    }

    fn confirm(&self, path: &Path) -> ConfirmationResult {
        let script = confirm_script(path);
        let chosen = capture_stdout(Command::new("powershell").args([
            "-NoProfile",
            "-Command",
            script.as_str(),
        ]));
        match chosen {
            Ok(label) => ConfirmationResult::from_label(&label),
            Err(error) => {
                tracing::debug!(%error, "powershell confirmation did not complete");
                ConfirmationResult::Cancel
            }
        }
    }

    fn notify(&self, title: &str, message: &str) {
        let script = format!(
            "Add-Type -AssemblyName System.Windows.Forms; \
             [System.Windows.Forms.MessageBox]::Show(\"{}\", \"{}\", \"OK\", \"Error\")",
            powershell_escape(message),
            powershell_escape(title),
        );
        if let Err(error) = run_checked(Command::new("powershell").args([
            "-NoProfile",
            "-Command",
            script.as_str(),
        ])) {
            tracing::warn!(%error, %title, "could not display notice");
        }
    }
}

/// Three-button form; prints `allow`, `always`, `block`, or nothing on close.
fn confirm_script(path: &Path) -> String {
    let buttons = [
        ("Allow Once", "allow", 100),
        ("Always Allow", "always", 200),
        ("Block", "block", 310),
    ]
    .iter()
    .map(|(label, tag, x)| {
        format!(
            "$b = New-Object System.Windows.Forms.Button\n\
             $b.Text = \"{label}\"\n\
             $b.Location = New-Object System.Drawing.Point({x}, 120)\n\
             $b.Add_Click({{ $form.Tag = \"{tag}\"; $form.Close() }})\n\
             $form.Controls.Add($b)\n"
        )
    })
    .collect::<String>();

    format!(
        "Add-Type -AssemblyName System.Windows.Forms\n\
         $form = New-Object System.Windows.Forms.Form\n\
         $form.Text = \"{title}\"\n\
         $form.Width = 450\n\
         $form.Height = 200\n\
         $form.StartPosition = \"CenterScreen\"\n\
         $form.FormBorderStyle = \"FixedDialog\"\n\
         $form.MaximizeBox = $false\n\
         $label = New-Object System.Windows.Forms.Label\n\
         $label.Text = \"Open this path?`n`n{path}\"\n\
         $label.AutoSize = $true\n\
         $label.Location = New-Object System.Drawing.Point(20, 20)\n\
         $form.Controls.Add($label)\n\
         {buttons}\
         $form.ShowDialog() | Out-Null\n\
         $form.Tag\n",
        title = powershell_escape(DIALOG_TITLE),
        path = powershell_escape(&path.display().to_string()),
    )
}

/// Registers `HKCU\Software\Classes\ope`, launching through a VBS shim so no
/// console window flashes on each click.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsRegistrar;

impl WindowsRegistrar {
    fn class_key() -> String {
        format!(r"HKCU\Software\Classes\{SCHEME}")
    }

    fn launcher_path(exe: &Path) -> PathBuf {
        exe.parent().unwrap_or_else(|| Path::new(".")).join(LAUNCHER)
    }
}

impl Registrar for WindowsRegistrar {
    fn install(&self, exe: &Path) -> Result<String> {
        let launcher = Self::launcher_path(exe);
        fs::write(&launcher, launcher_script(exe))
            .with_context(|| format!("Failed to write {}", launcher.display()))?;

        let key = Self::class_key();
        let handler = format!("wscript.exe \"{}\" \"%1\"", launcher.display());
        let description = format!("URL:{SCHEME} Protocol");
        let command_key = format!(r"{key}\shell\open\command");

        let entries: [&[&str]; 3] = [
            &["add", key.as_str(), "/ve", "/d", description.as_str(), "/f"],
            &["add", key.as_str(), "/v", "URL Protocol", "/d", "", "/f"],
            &["add", command_key.as_str(), "/ve", "/d", handler.as_str(), "/f"],
        ];
        for args in entries {
            run_checked(Command::new("reg").args(args))
                .context("Failed to write scheme registry keys")?;
        }

        Ok(key)
    }

    fn uninstall(&self) -> Result<String> {
        if let Ok(exe) = std::env::current_exe() {
            let _ = fs::remove_file(Self::launcher_path(&exe));
        }
        let key = Self::class_key();
        run_checked(Command::new("reg").args(["delete", key.as_str(), "/f"]))
            .context("Failed to remove registry keys")?;
        Ok(key)
    }
}

fn launcher_script(exe: &Path) -> String {
    format!(
        "Set WshShell = CreateObject(\"WScript.Shell\")\r\n\
         WshShell.Run Chr(34) & \"{}\" & Chr(34) & \" \" & Chr(34) & WScript.Arguments(0) & Chr(34), 0, False\r\n",
        exe.display()
    )
}
