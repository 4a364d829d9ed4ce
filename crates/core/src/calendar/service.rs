//! Reminder scheduler - core business logic
//!
//! `schedule_reminder` runs a strictly sequential chain per user:
//! token lookup, target-day resolution, idempotency check, free/busy query,
//! slot selection and event creation. Calendar-provider failures become
//! [`SkipReason`] values; only identity-provider failures and contract
//! errors surface as `Err`.

use std::sync::Arc;

use brief_domain::constants::GOOGLE_OAUTH_PROVIDER;
use brief_domain::{
    BriefError, CalendarConfig, CalendarResult, ExistingReminder, IdempotencyMode,
    NewCalendarEvent, ReminderBatchReport, ReminderStatus, Result, SkipReason, UserRecord,
    UserReminderOutcome,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};

use super::locks::UserLocks;
use super::ports::{AccessTokenProvider, CalendarApi};
use super::slots::select_slot;
use crate::time::{day_window, format_instant, local_date, local_datetime_to_utc, target_day};

/// Email placeholder for directory users without an address.
const UNKNOWN_EMAIL: &str = "unknown";

/// Weekly reminder scheduler
pub struct ReminderScheduler {
    tokens: Arc<dyn AccessTokenProvider>,
    calendar: Arc<dyn CalendarApi>,
    settings: CalendarConfig,
    timezone: Tz,
    locks: Option<UserLocks>,
}

impl ReminderScheduler {
    /// Build a scheduler; rejects an empty sentinel title or a zero slot
    /// length.
    pub fn new(
        tokens: Arc<dyn AccessTokenProvider>,
        calendar: Arc<dyn CalendarApi>,
        settings: CalendarConfig,
        timezone: Tz,
    ) -> Result<Self> {
        if settings.event_title.trim().is_empty() {
            return Err(BriefError::Config("calendar.event_title must not be empty".into()));
        }
        if settings.slot_minutes == 0 {
            return Err(BriefError::Config("calendar.slot_minutes must be positive".into()));
        }

        let locks = match settings.idempotency {
            IdempotencyMode::BestEffort => None,
            IdempotencyMode::PerUserLock => Some(UserLocks::new()),
        };
        Ok(Self { tokens, calendar, settings, timezone, locks })
    }

    /// Calendar settings in effect.
    pub fn settings(&self) -> &CalendarConfig {
        &self.settings
    }

    /// Zone used for target days and slots.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Google access token for the user, `None` when no account is linked.
    pub async fn get_google_access_token(&self, user_id: &str) -> Result<Option<String>> {
        let token = self.tokens.oauth_access_token(user_id, GOOGLE_OAUTH_PROVIDER).await?;
        Ok(token.filter(|t| !t.is_empty()))
    }

    /// Target day for a run at `now`, in the configured timezone.
    pub fn target_date(&self, now: DateTime<Utc>) -> NaiveDate {
        target_day(self.settings.target_day, local_date(now, self.timezone))
    }

    /// Look up the sentinel event on `date`.
    ///
    /// The provider's `q` search is fuzzy, so only an exact title match
    /// counts.
    pub async fn has_existing_reminder(
        &self,
        access_token: &str,
        date: NaiveDate,
    ) -> Result<Option<ExistingReminder>> {
        let window = day_window(date, self.timezone);
        let events = self
            .calendar
            .search_events(access_token, window, self.timezone, &self.settings.event_title)
            .await?;

        let title = self.settings.event_title.as_str();
        Ok(events.into_iter().find(|e| e.summary.as_deref() == Some(title)).map(|e| {
            ExistingReminder {
                event_id: e.id,
                start_time: e.start.unwrap_or_else(|| date.to_string()),
            }
        }))
    }

    /// Read-only view of this week's reminder. Never creates anything.
    #[instrument(skip(self))]
    pub async fn reminder_status(&self, user_id: &str, now: DateTime<Utc>) -> Result<ReminderStatus> {
        let Some(token) = self.get_google_access_token(user_id).await? else {
            return Ok(ReminderStatus::default());
        };

        let existing = self.has_existing_reminder(&token, self.target_date(now)).await?;
        Ok(existing.into())
    }

    /// Schedule this week's reminder for `user_id` relative to the current
    /// time.
    pub async fn schedule_reminder(&self, user_id: &str) -> Result<CalendarResult> {
        self.schedule_reminder_at(user_id, Utc::now()).await
    }

    /// Schedule the reminder for the target day derived from `now`.
    ///
    /// Repeated calls for the same week return the existing event. Under
    /// [`IdempotencyMode::BestEffort`] two overlapping calls for one user can
    /// still both create an event.
    #[instrument(skip(self), fields(target_date))]
    pub async fn schedule_reminder_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CalendarResult> {
        let _guard = match &self.locks {
            Some(locks) => Some(locks.lock_owned(user_id).await),
            None => None,
        };

        let Some(token) = self.get_google_access_token(user_id).await? else {
            info!("No linked Google account, skipping");
            return Ok(CalendarResult::skipped(SkipReason::NoGoogleToken));
        };

        let date = self.target_date(now);
        tracing::Span::current().record("target_date", tracing::field::display(date));

        match self.has_existing_reminder(&token, date).await {
            Ok(Some(existing)) => {
                debug!(event_id = %existing.event_id, "Reminder already scheduled");
                return Ok(existing.into());
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "Existing reminder lookup failed");
                return Ok(CalendarResult::skipped(SkipReason::CalendarQueryFailed));
            }
        }

        let window = day_window(date, self.timezone);
        let busy = match self.calendar.query_free_busy(&token, window, self.timezone).await {
            Ok(busy) => busy,
            Err(err) => {
                warn!(error = %err, "Free/busy query failed");
                return Ok(CalendarResult::skipped(SkipReason::CalendarQueryFailed));
            }
        };

        let Some(slot) = select_slot(
            self.settings.slot_policy,
            date,
            self.timezone,
            self.settings.slot_minutes,
            &busy,
        ) else {
            info!(busy_intervals = busy.len(), "No free slot on target day");
            return Ok(CalendarResult::skipped(SkipReason::NoFreeSlot));
        };

        let event = NewCalendarEvent {
            summary: self.settings.event_title.clone(),
            description: self.settings.event_description.clone(),
            slot,
            time_zone: self.timezone,
            popup_minutes: self.settings.popup_minutes,
        };

        match self.calendar.create_event(&token, &event).await {
            Ok(created) => {
                let start_time = created.start_time.unwrap_or_else(|| {
                    format_instant(local_datetime_to_utc(slot.start, self.timezone))
                });
                info!(event_id = %created.event_id, start_time = %start_time, "Reminder scheduled");
                Ok(CalendarResult::scheduled(created.event_id, start_time))
            }
            Err(err) => {
                warn!(error = %err, "Reminder event creation failed");
                Ok(CalendarResult::skipped(SkipReason::CreateFailed))
            }
        }
    }

    /// Schedule reminders for every user, one at a time.
    ///
    /// A failure for one user is recorded as [`SkipReason::Error`] and never
    /// stops the rest of the batch.
    #[instrument(skip(self, users), fields(users = users.len()))]
    pub async fn run_batch(&self, users: &[UserRecord], now: DateTime<Utc>) -> ReminderBatchReport {
        let mut results = Vec::with_capacity(users.len());

        for user in users {
            let calendar = match self.schedule_reminder_at(&user.id, now).await {
                Ok(result) => result,
                Err(err) => {
                    warn!(user_id = %user.id, error = %err, kind = err.label(), "Calendar scheduling failed");
                    CalendarResult::skipped(SkipReason::Error)
                }
            };
            results.push(UserReminderOutcome {
                user_id: user.id.clone(),
                email: user.email.clone().unwrap_or_else(|| UNKNOWN_EMAIL.to_string()),
                calendar,
            });
        }

        let scheduled = results.iter().filter(|r| r.calendar.is_scheduled()).count();
        let skipped = results.len() - scheduled;
        info!(processed = results.len(), scheduled, skipped, "Calendar reminders processed");

        ReminderBatchReport { success: true, processed: results.len(), scheduled, skipped, results }
    }
}

impl std::fmt::Debug for ReminderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReminderScheduler")
            .field("settings", &self.settings)
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}
