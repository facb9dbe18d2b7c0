use anyhow::{Context, Result};
use std::process::Command;

pub(super) fn run_checked(command: &mut Command) -> Result<()> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("Failed to spawn {program}"))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("{program} failed ({}): {}", output.status, stderr.trim());
    }
    Ok(())
}

/// Run to completion and return trimmed stdout; a non-zero exit is an error.
pub(super) fn capture_stdout(command: &mut Command) -> Result<String> {
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("Failed to spawn {program}"))?;
    if !output.status.success() {
        anyhow::bail!("{program} exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

pub(super) fn xml_escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Escape for an AppleScript double-quoted string literal.
pub(super) fn applescript_escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape for a PowerShell double-quoted string literal.
pub(super) fn powershell_escape(raw: &str) -> String {
    raw.replace('`', "``")
        .replace('"', "`\"")
        .replace('$', "`$")
}
