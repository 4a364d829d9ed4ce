//! # Brief Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Wall-clock utilities (target day, per-date timezone resolution)
//! - The calendar reminder scheduler and its slot-selection policies
//! - The escalation engine behind the shame bot
//! - Report normalisation and generation
//!
//! ## Architecture Principles
//! - Only depends on `brief-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits (ports)
//! - The current instant is always a parameter, never read implicitly by
//!   policy functions

pub mod calendar;
pub mod escalation;
pub mod llm;
pub mod report;
pub mod time;

// Re-export specific items to avoid ambiguity
pub use calendar::ports::{AccessTokenProvider, CalendarApi, UserDirectory};
pub use calendar::{select_slot, ReminderBatch, ReminderScheduler};
pub use escalation::ports::{Notifier, SubmissionSource};
pub use escalation::{find_delinquents, get_escalation_level, ShameBot};
pub use llm::{CompletionGateway, LlmSettings};
pub use report::ports::ReportPublisher;
pub use report::{normalize_report, ReportGenerator};
pub use time::{get_next_friday, get_next_monday, local_to_utc, week_of};
