use super::Desktop;
use crate::security::ConfirmationResult;
use anyhow::Result;
use console::{Term, style};
use dialoguer::Select;
use std::path::Path;

const CHOICES: [(&str, ConfirmationResult); 4] = [
    ("Allow once", ConfirmationResult::AllowOnce),
    ("Always allow", ConfirmationResult::AlwaysAllow),
    ("Block", ConfirmationResult::AlwaysBlock),
    ("Cancel", ConfirmationResult::Cancel),
];

/// Prompts on stderr instead of GUI dialogs; opening still goes through the
/// wrapped native backend.
pub struct TerminalDesktop {
    native: Box<dyn Desktop>,
}

impl TerminalDesktop {
    pub fn new(native: Box<dyn Desktop>) -> Self {
        Self { native }
    }
}

impl Desktop for TerminalDesktop {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn open(&self, path: &Path) -> Result<()> {
        self.native.open(path)
    }

    fn confirm(&self, path: &Path) -> ConfirmationResult {
        let labels: Vec<&str> = CHOICES.iter().map(|(label, _)| *label).collect();
        let selection = Select::new()
            .with_prompt(format!("Open this path?\n  {}", path.display()))
            .items(&labels)
            .default(0)
            .interact_on_opt(&Term::stderr());

        match selection {
            Ok(Some(index)) => choice_at(index),
            Ok(None) => ConfirmationResult::Cancel,
            Err(error) => {
                tracing::debug!(%error, "terminal prompt failed");
                ConfirmationResult::Cancel
            }
        }
    }

    fn notify(&self, title: &str, message: &str) {
        let line = format!("{} {message}", style(format!("{title}:")).red().bold());
        if let Err(error) = Term::stderr().write_line(&line) {
            tracing::warn!(%error, %title, "could not display notice");
        }
    }
}

fn choice_at(index: usize) -> ConfirmationResult {
    CHOICES
        .get(index)
        .map_or(ConfirmationResult::Cancel, |(_, result)| *result)
}
