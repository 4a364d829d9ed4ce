//! Calendar reminder types
//!
//! `CalendarResult` is the value every scheduling attempt resolves to. It is
//! modelled as an enum so that a scheduled result always carries its event id
//! and start time, and a skipped result always carries a reason. On the wire
//! it keeps the flat `{scheduled, eventId?, startTime?, reason?}` shape.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::impl_code_conversions;

/// Why a reminder was not scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The user never linked a Google account.
    NoGoogleToken,
    /// Every candidate slot on the target day overlapped a busy interval.
    NoFreeSlot,
    /// Free/busy or event-search query failed.
    CalendarQueryFailed,
    /// Event creation was rejected by the provider.
    CreateFailed,
    /// Unexpected failure while processing the user (batch only).
    Error,
}

impl_code_conversions!(SkipReason {
    NoGoogleToken => "no_google_token",
    NoFreeSlot => "no_free_slot",
    CalendarQueryFailed => "calendar_query_failed",
    CreateFailed => "create_failed",
    Error => "error",
});

/// Outcome of a scheduling attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "CalendarResultWire", try_from = "CalendarResultWire")]
pub enum CalendarResult {
    /// A reminder exists, created now or found from an earlier run.
    Scheduled { event_id: String, start_time: String },
    /// No reminder was created.
    Skipped { reason: SkipReason },
}

impl CalendarResult {
    /// A reminder that exists on the calendar.
    pub fn scheduled(event_id: impl Into<String>, start_time: impl Into<String>) -> Self {
        Self::Scheduled { event_id: event_id.into(), start_time: start_time.into() }
    }

    /// No reminder, for `reason`.
    pub const fn skipped(reason: SkipReason) -> Self {
        Self::Skipped { reason }
    }

    /// Whether a reminder exists.
    pub const fn is_scheduled(&self) -> bool {
        matches!(self, Self::Scheduled { .. })
    }

    /// Provider event id when scheduled.
    pub fn event_id(&self) -> Option<&str> {
        match self {
            Self::Scheduled { event_id, .. } => Some(event_id),
            Self::Skipped { .. } => None,
        }
    }

    /// Start time when scheduled.
    pub fn start_time(&self) -> Option<&str> {
        match self {
            Self::Scheduled { start_time, .. } => Some(start_time),
            Self::Skipped { .. } => None,
        }
    }

    /// Skip reason when skipped.
    pub const fn reason(&self) -> Option<SkipReason> {
        match self {
            Self::Scheduled { .. } => None,
            Self::Skipped { reason } => Some(*reason),
        }
    }
}

impl From<ExistingReminder> for CalendarResult {
    fn from(existing: ExistingReminder) -> Self {
        Self::Scheduled { event_id: existing.event_id, start_time: existing.start_time }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarResultWire {
    scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<SkipReason>,
}

impl From<CalendarResult> for CalendarResultWire {
    fn from(result: CalendarResult) -> Self {
        match result {
            CalendarResult::Scheduled { event_id, start_time } => Self {
                scheduled: true,
                event_id: Some(event_id),
                start_time: Some(start_time),
                reason: None,
            },
            CalendarResult::Skipped { reason } => {
                Self { scheduled: false, event_id: None, start_time: None, reason: Some(reason) }
            }
        }
    }
}

/// Rejected wire payload for [`CalendarResult`]
#[derive(Debug)]
pub struct MalformedCalendarResult(&'static str);

impl fmt::Display for MalformedCalendarResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl TryFrom<CalendarResultWire> for CalendarResult {
    type Error = MalformedCalendarResult;

    fn try_from(wire: CalendarResultWire) -> Result<Self, Self::Error> {
        if wire.scheduled {
            match (wire.event_id, wire.start_time) {
                (Some(event_id), Some(start_time)) => Ok(Self::Scheduled { event_id, start_time }),
                _ => Err(MalformedCalendarResult(
                    "scheduled result requires both eventId and startTime",
                )),
            }
        } else {
            wire.reason
                .map(|reason| Self::Skipped { reason })
                .ok_or(MalformedCalendarResult("unscheduled result requires a reason"))
        }
    }
}

/// Busy range returned by a free/busy query. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    /// Busy from `start` (inclusive) to `end` (exclusive).
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test: touching ranges do not overlap.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && self.end > start
    }
}

/// UTC query window sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Event as returned by the provider's event search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventSummary {
    pub id: String,
    pub summary: Option<String>,
    /// `start.dateTime`, falling back to `start.date`.
    pub start: Option<String>,
}

/// A sentinel reminder already present on the user's calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExistingReminder {
    pub event_id: String,
    /// `start.dateTime`, or `start.date` for all-day events.
    pub start_time: String,
}

/// Selected placement, expressed as wall-clock time in the target timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderSlot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Event creation request handed to the calendar provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCalendarEvent {
    pub summary: String,
    pub description: String,
    pub slot: ReminderSlot,
    pub time_zone: Tz,
    /// Pop-up reminder offset; `0` fires when the event starts.
    pub popup_minutes: u32,
}

/// Provider answer to an event creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    pub event_id: String,
    pub start_time: Option<String>,
}

/// Read-only visibility into whether this week's reminder exists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatus {
    pub scheduled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
}

impl From<Option<ExistingReminder>> for ReminderStatus {
    fn from(existing: Option<ExistingReminder>) -> Self {
        match existing {
            Some(found) => Self {
                scheduled: true,
                event_id: Some(found.event_id),
                start_time: Some(found.start_time),
            },
            None => Self::default(),
        }
    }
}
