//! Team roster and identity-provider users

use serde::{Deserialize, Serialize};

use super::calendar::CalendarResult;

/// Static roster entry diffed against this week's submissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub email: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack_id: Option<String>,
}

impl TeamMember {
    /// Roster entry without a Slack id.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { email: email.into(), name: name.into(), slack_id: None }
    }
}

/// User as listed by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub email: Option<String>,
}

/// One entry of the reminder batch report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReminderOutcome {
    pub user_id: String,
    pub email: String,
    pub calendar: CalendarResult,
}

/// Summary returned by the reminder cron batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderBatchReport {
    pub success: bool,
    pub processed: usize,
    pub scheduled: usize,
    pub skipped: usize,
    pub results: Vec<UserReminderOutcome>,
}
