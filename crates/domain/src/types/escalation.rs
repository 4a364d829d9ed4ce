//! Escalation tiers for reminder wording

use serde::{Deserialize, Serialize};

use crate::impl_code_conversions;

/// How aggressively a reminder is worded. Computed fresh on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationLevel {
    Gentle,
    /// Only produced by the three-tier schedule.
    Medium,
    FullRoast,
}

impl_code_conversions!(EscalationLevel {
    Gentle => "GENTLE",
    Medium => "MEDIUM",
    FullRoast => "FULL_ROAST",
});

/// Result of one shame bot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShameBotOutcome {
    pub success: bool,
    /// Absent when everybody submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<EscalationLevel>,
    /// Emails of members who have not submitted.
    pub delinquents: Vec<String>,
    pub message: String,
}
