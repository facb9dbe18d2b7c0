use crate::config::Policy;

/// The user's answer to an [`Ask`](super::Decision::Ask).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConfirmationResult {
    AllowOnce,
    AlwaysAllow,
    AlwaysBlock,
    Cancel,
}

impl ConfirmationResult {
    /// Map the text a dialog backend printed to a result.
    ///
    /// Accepts the button labels (`Allow Once`, `Always Allow`, `Block`), the
    /// short tokens some backends emit (`allow`, `always`, `block`), and an
    /// AppleScript `button returned:` prefix. Anything else is `Cancel`.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        let label = label.strip_prefix("button returned:").unwrap_or(label);
        match label.trim().to_ascii_lowercase().as_str() {
            "allow once" | "allow" => Self::AllowOnce,
            "always allow" | "always" => Self::AlwaysAllow,
            "block" => Self::AlwaysBlock,
            _ => Self::Cancel,
        }
    }
}

/// What the workflow does after a confirmation has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Open { persist: bool },
    Reject { persist: bool },
    Cancel,
}

/// Record `result` for `base` in `policy` and say what happens next.
///
/// Only the `Always*` answers touch the policy, each appending `base`
/// verbatim to exactly one list.
pub fn apply_confirmation(policy: &mut Policy, base: &str, result: ConfirmationResult) -> FollowUp {
    match result {
        ConfirmationResult::AllowOnce => FollowUp::Open { persist: false },
        ConfirmationResult::AlwaysAllow => {
            policy.allowed.push(base.to_string());
            FollowUp::Open { persist: true }
        }
        ConfirmationResult::AlwaysBlock => {
            policy.blocked.push(base.to_string());
            FollowUp::Reject { persist: true }
        }
        ConfirmationResult::Cancel => FollowUp::Cancel,
    }
}
