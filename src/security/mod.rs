pub mod confirm;
pub mod engine;

pub use confirm::{ConfirmationResult, FollowUp, apply_confirmation};
pub use engine::{Decision, base_name, decide, decide_with, pattern_matches};
