//! Calendar reminder port interfaces

use async_trait::async_trait;
use brief_domain::{
    BusyInterval, CalendarEventSummary, CreatedEvent, NewCalendarEvent, Result, TimeWindow,
    UserRecord,
};
use chrono_tz::Tz;

/// Identity provider holding the users' linked OAuth grants
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Current access token for `provider`, or `None` when the user never
    /// linked that account.
    async fn oauth_access_token(&self, user_id: &str, provider: &str) -> Result<Option<String>>;
}

/// Calendar provider operations, always on the user's primary calendar
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Busy intervals inside `window`.
    async fn query_free_busy(
        &self,
        access_token: &str,
        window: TimeWindow,
        time_zone: Tz,
    ) -> Result<Vec<BusyInterval>>;

    /// Single (expanded) events inside `window` whose text matches `query`.
    /// Matching is fuzzy; callers filter on the exact title.
    async fn search_events(
        &self,
        access_token: &str,
        window: TimeWindow,
        time_zone: Tz,
        query: &str,
    ) -> Result<Vec<CalendarEventSummary>>;

    async fn create_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedEvent>;
}

/// User listing for the reminder batch
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list_users(&self, limit: u32) -> Result<Vec<UserRecord>>;
}
