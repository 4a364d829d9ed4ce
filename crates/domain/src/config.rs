//! Configuration structures
//!
//! Every section has serde defaults so partial TOML/JSON files are valid.
//! Policies that drifted over the lifetime of the product (target day, slot
//! selection, escalation schedule) are explicit configuration rather than
//! constants.

use std::fmt;

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MEETING_BUFFER_MINUTES, DEFAULT_NO_MEETINGS_HOUR, DEFAULT_ROAST_FROM_HOUR,
    DEFAULT_SLOT_MINUTES, DEFAULT_WINDOW_END_HOUR, DEFAULT_WINDOW_START_HOUR,
    REMINDER_EVENT_DESCRIPTION, REMINDER_EVENT_TITLE,
};
use crate::errors::{BriefError, Result};
use crate::types::TeamMember;

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Zone all wall-clock arithmetic happens in.
    pub timezone: Tz,
    pub calendar: CalendarConfig,
    pub escalation: EscalationConfig,
    pub schedule: ScheduleConfig,
    pub services: ServiceEndpoints,
    pub secrets: Secrets,
    pub team: Vec<TeamMember>,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::London,
            calendar: CalendarConfig::default(),
            escalation: EscalationConfig::default(),
            schedule: ScheduleConfig::default(),
            services: ServiceEndpoints::default(),
            secrets: Secrets::default(),
            team: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Which day the weekly reminder lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDayPolicy {
    pub weekday: Weekday,
    /// When today already is `weekday`, target today instead of next week.
    pub include_today: bool,
}

impl TargetDayPolicy {
    /// Pre-deadline reminder: this Friday, or today when it is Friday.
    pub const UPCOMING_FRIDAY: Self = Self { weekday: Weekday::Fri, include_today: true };
    /// Deadline-day reminder: this Monday, or today when it is Monday.
    pub const UPCOMING_MONDAY: Self = Self { weekday: Weekday::Mon, include_today: true };
}

impl Default for TargetDayPolicy {
    fn default() -> Self {
        Self::UPCOMING_FRIDAY
    }
}

/// How a free slot is picked on the target day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotPolicy {
    /// Place the reminder `buffer_minutes` after the last busy interval ends,
    /// or at `default_hour` when the day is empty.
    AfterLastMeeting { default_hour: u32, buffer_minutes: u32 },
    /// First slot in `[start_hour, end_hour)` that overlaps nothing.
    FirstFreeInWindow { start_hour: u32, end_hour: u32 },
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self::AfterLastMeeting {
            default_hour: DEFAULT_NO_MEETINGS_HOUR,
            buffer_minutes: DEFAULT_MEETING_BUFFER_MINUTES,
        }
    }
}

impl SlotPolicy {
    /// Business-hours window scan with the stock 09:00-12:00 bounds.
    pub const fn morning_window() -> Self {
        Self::FirstFreeInWindow {
            start_hour: DEFAULT_WINDOW_START_HOUR,
            end_hour: DEFAULT_WINDOW_END_HOUR,
        }
    }
}

/// Duplicate-event protection level
///
/// The existence check against the provider is not transactional, so two
/// overlapping invocations for one user can both create an event
/// (at-least-once). `PerUserLock` serialises invocations per user inside a
/// single process; it does not help across processes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdempotencyMode {
    #[default]
    BestEffort,
    PerUserLock,
}

/// Calendar reminder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Sentinel title; also the idempotency key.
    pub event_title: String,
    pub event_description: String,
    pub slot_minutes: u32,
    pub popup_minutes: u32,
    pub target_day: TargetDayPolicy,
    pub slot_policy: SlotPolicy,
    pub idempotency: IdempotencyMode,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            event_title: REMINDER_EVENT_TITLE.to_string(),
            event_description: REMINDER_EVENT_DESCRIPTION.to_string(),
            slot_minutes: DEFAULT_SLOT_MINUTES,
            popup_minutes: 0,
            target_day: TargetDayPolicy::default(),
            slot_policy: SlotPolicy::default(),
            idempotency: IdempotencyMode::default(),
        }
    }
}

/// Escalation schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EscalationPolicy {
    /// `FULL_ROAST` on Monday, `GENTLE` otherwise.
    TwoTier,
    /// `FULL_ROAST` on Monday from `roast_from_hour`, `MEDIUM` on Sunday,
    /// `GENTLE` otherwise.
    ThreeTier { roast_from_hour: u32 },
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self::TwoTier
    }
}

impl EscalationPolicy {
    /// Three tiers with the default roast hour.
    pub const fn three_tier() -> Self {
        Self::ThreeTier { roast_from_hour: DEFAULT_ROAST_FROM_HOUR }
    }
}

/// Shame bot settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationConfig {
    pub policy: EscalationPolicy,
}

/// Cron expressions (seconds precision, evaluated in `Config::timezone`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub calendar_reminders: String,
    pub shame_bot: Vec<String>,
    pub job_timeout_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            calendar_reminders: "0 0 6 * * Fri".to_string(),
            shame_bot: vec![
                "0 0 16 * * Fri".to_string(),
                "0 0 18 * * Sun".to_string(),
                "0 0 8 * * Mon".to_string(),
            ],
            job_timeout_secs: 300,
        }
    }
}

/// Base URLs of third-party APIs (overridable for tests)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub google_calendar: String,
    pub clerk_api: String,
    pub notion_api: String,
    pub notion_version: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            google_calendar: "https://www.googleapis.com/calendar/v3".to_string(),
            clerk_api: "https://api.clerk.com/v1".to_string(),
            notion_api: "https://api.notion.com/v1".to_string(),
            notion_version: "2022-06-28".to_string(),
        }
    }
}

/// Credentials and secret URLs. Each is optional at load time and required
/// by the adapter that uses it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secrets {
    pub clerk_secret_key: Option<String>,
    pub llm_gateway_url: Option<String>,
    pub notion_api_key: Option<String>,
    pub notion_database_id: Option<String>,
    pub slack_webhook_url: Option<String>,
}

impl Secrets {
    /// Clerk secret key, or a config error when unset.
    pub fn clerk_secret_key(&self) -> Result<&str> {
        require(self.clerk_secret_key.as_deref(), "CLERK_SECRET_KEY")
    }

    /// LLM gateway base URL, or a config error when unset.
    pub fn llm_gateway_url(&self) -> Result<&str> {
        require(self.llm_gateway_url.as_deref(), "LLM_GATEWAY_URL")
    }

    /// Notion API key, or a config error when unset.
    pub fn notion_api_key(&self) -> Result<&str> {
        require(self.notion_api_key.as_deref(), "NOTION_API_KEY")
    }

    /// Notion database id, or a config error when unset.
    pub fn notion_database_id(&self) -> Result<&str> {
        require(self.notion_database_id.as_deref(), "NOTION_DATABASE_ID")
    }

    /// Slack webhook URL, or a config error when unset.
    pub fn slack_webhook_url(&self) -> Result<&str> {
        require(self.slack_webhook_url.as_deref(), "SLACK_WEBHOOK_URL")
    }
}

fn require<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| BriefError::Config(format!("{name} is not set")))
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn mask(value: Option<&String>) -> &'static str {
            if value.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Secrets")
            .field("clerk_secret_key", &mask(self.clerk_secret_key.as_ref()))
            .field("llm_gateway_url", &mask(self.llm_gateway_url.as_ref()))
            .field("notion_api_key", &mask(self.notion_api_key.as_ref()))
            .field("notion_database_id", &mask(self.notion_database_id.as_ref()))
            .field("slack_webhook_url", &mask(self.slack_webhook_url.as_ref()))
            .finish()
    }
}

/// Logging output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
