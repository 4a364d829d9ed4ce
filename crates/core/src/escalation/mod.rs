//! Escalation engine and the weekly shame bot

mod level;
pub mod ports;
mod prompt;
mod service;

pub use level::{find_delinquents, get_escalation_level};
pub use prompt::{build_shame_prompt, pick_theme, REFERENCE_THEMES, SHAME_PROMPT};
pub use service::ShameBot;
