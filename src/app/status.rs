use crate::config::Policy;

/// Text printed by `ope config`.
pub fn render_config(location: &str, policy: &Policy) -> String {
    [
        format!("Config:  {location}"),
        format!("Blocked: {}", render_list(&policy.blocked)),
        format!("Allowed: {}", render_list(&policy.allowed)),
    ]
    .join("\n")
}

fn render_list(patterns: &[String]) -> String {
    if patterns.is_empty() {
        "(none)".to_string()
    } else {
        patterns.join(", ")
    }
}
