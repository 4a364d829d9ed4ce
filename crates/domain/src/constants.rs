//! Application constants
//!
//! Centralized location for domain-level constants. Values that vary per
//! deployment live in [`crate::config`] and use these as defaults.

// Calendar reminder
pub const REMINDER_EVENT_TITLE: &str = "Brief - Weekly Update";
pub const REMINDER_EVENT_DESCRIPTION: &str =
    "Time to fill in your weekly Brief update.\n\nOpen Brief: https://brief.palindrom.ai/checkin";
pub const DEFAULT_TIMEZONE: &str = "Europe/London";
pub const DEFAULT_SLOT_MINUTES: u32 = 15;
pub const DEFAULT_NO_MEETINGS_HOUR: u32 = 12;
pub const DEFAULT_MEETING_BUFFER_MINUTES: u32 = 15;
pub const DEFAULT_WINDOW_START_HOUR: u32 = 9;
pub const DEFAULT_WINDOW_END_HOUR: u32 = 12;
pub const PRIMARY_CALENDAR_ID: &str = "primary";
pub const GOOGLE_OAUTH_PROVIDER: &str = "google";

// Escalation
pub const DEFAULT_ROAST_FROM_HOUR: u32 = 7;
pub const CELEBRATION_MESSAGE: &str = "🎉 *Incredible!* Everyone submitted their Brief this week. The CEO is impressed. You may all have a biscuit. 🍪";
pub const FALLBACK_SHAME_MESSAGE: &str = "Updates are due Monday 9am!";

// LLM gateway
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LLM_FALLBACK_MODEL: &str = "claude-3-5-haiku-latest";

// Report defaults
pub const REPORT_NONE: &str = "None";
pub const REPORT_DEFAULT_VIBE: &str = "No concerns";

// Batch
pub const USER_LIST_LIMIT: u32 = 100;
