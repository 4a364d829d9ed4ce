//! Google Calendar adapter
//!
//! Query endpoints take UTC instants; event creation takes an offset-free
//! local wall-clock string next to an explicit `timeZone`.

use async_trait::async_trait;
use brief_core::time::{format_instant, format_local};
use brief_core::CalendarApi;
use brief_domain::constants::PRIMARY_CALENDAR_ID;
use brief_domain::{
    BriefError, BusyInterval, CalendarEventSummary, CreatedEvent, NewCalendarEvent, Result,
    TimeWindow,
};
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::http::HttpClient;

/// Google Calendar v3 client acting on each user's primary calendar
pub struct GoogleCalendarClient {
    http: HttpClient,
    base_url: String,
}

impl GoogleCalendarClient {
    /// `http` should not retry: scheduling failures are reported, never
    /// retried in-process.
    pub fn new(base_url: impl Into<String>, http: HttpClient) -> Self {
        Self { http, base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{PRIMARY_CALENDAR_ID}/events", self.base_url)
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendarClient {
    async fn query_free_busy(
        &self,
        access_token: &str,
        window: TimeWindow,
        time_zone: Tz,
    ) -> Result<Vec<BusyInterval>> {
        let body = json!({
            "timeMin": format_instant(window.start),
            "timeMax": format_instant(window.end),
            "timeZone": time_zone.name(),
            "items": [{ "id": PRIMARY_CALENDAR_ID }],
        });

        let request = self
            .http
            .request(Method::POST, format!("{}/freeBusy", self.base_url))
            .bearer_auth(access_token)
            .json(&body);
        let response: FreeBusyResponse = self.http.send_json(request).await?;

        // An absent primary entry reads as an empty day.
        let Some(calendar) = response.calendars.get(PRIMARY_CALENDAR_ID) else {
            debug!("freeBusy answered without a primary calendar");
            return Ok(Vec::new());
        };

        if let Some(error) = calendar.errors.first() {
            return Err(BriefError::Upstream {
                status: 200,
                body: format!("freeBusy calendar error: {}", error.reason),
            });
        }

        let busy: Vec<BusyInterval> = calendar
            .busy
            .iter()
            .map(|slot| BusyInterval::new(slot.start.with_timezone(&Utc), slot.end.with_timezone(&Utc)))
            .collect();
        debug!(intervals = busy.len(), "freeBusy answered");
        Ok(busy)
    }

    async fn search_events(
        &self,
        access_token: &str,
        window: TimeWindow,
        time_zone: Tz,
        query: &str,
    ) -> Result<Vec<CalendarEventSummary>> {
        let params = [
            ("timeMin", format_instant(window.start)),
            ("timeMax", format_instant(window.end)),
            ("timeZone", time_zone.name().to_string()),
            ("singleEvents", "true".to_string()),
            ("q", query.to_string()),
        ];

        let request = self
            .http
            .request(Method::GET, self.events_url())
            .bearer_auth(access_token)
            .query(&params);
        let response: EventsResponse = self.http.send_json(request).await?;

        Ok(response
            .items
            .into_iter()
            .map(|item| CalendarEventSummary {
                id: item.id,
                summary: item.summary,
                start: item.start.and_then(|s| s.date_time.or(s.date)),
            })
            .collect())
    }

    async fn create_event(
        &self,
        access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedEvent> {
        let zone = event.time_zone.name();
        let body = NewEventBody {
            summary: &event.summary,
            description: &event.description,
            start: LocalDateTime { date_time: format_local(event.slot.start), time_zone: zone },
            end: LocalDateTime { date_time: format_local(event.slot.end), time_zone: zone },
            reminders: Reminders {
                use_default: false,
                overrides: vec![ReminderOverride { method: "popup", minutes: event.popup_minutes }],
            },
        };

        let request =
            self.http.request(Method::POST, self.events_url()).bearer_auth(access_token).json(&body);
        let created: EventItem = self.http.send_json(request).await?;

        Ok(CreatedEvent {
            event_id: created.id,
            start_time: created.start.and_then(|s| s.date_time.or(s.date)),
        })
    }
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: std::collections::HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<FreeBusySlot>,
    #[serde(default)]
    errors: Vec<FreeBusyError>,
}

#[derive(Debug, Deserialize)]
struct FreeBusySlot {
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyError {
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
struct EventsResponse {
    #[serde(default)]
    items: Vec<EventItem>,
}

#[derive(Debug, Deserialize)]
struct EventItem {
    id: String,
    summary: Option<String>,
    start: Option<EventDateTime>,
}

#[derive(Debug, Deserialize)]
struct EventDateTime {
    #[serde(rename = "dateTime")]
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewEventBody<'a> {
    summary: &'a str,
    description: &'a str,
    start: LocalDateTime<'a>,
    end: LocalDateTime<'a>,
    reminders: Reminders,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LocalDateTime<'a> {
    date_time: String,
    time_zone: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Reminders {
    use_default: bool,
    overrides: Vec<ReminderOverride>,
}

#[derive(Debug, Serialize)]
struct ReminderOverride {
    method: &'static str,
    minutes: u32,
}

#[cfg(test)]
mod tests {
    use brief_domain::ReminderSlot;
    use chrono::{NaiveDate, TimeZone};
    use chrono_tz::Europe::London;
    use serde_json::Value;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(server: &MockServer) -> GoogleCalendarClient {
        let http = HttpClient::builder().max_attempts(1).build().unwrap();
        GoogleCalendarClient::new(server.uri(), http)
    }

    fn summer_window() -> TimeWindow {
        TimeWindow {
            start: Utc.with_ymd_and_hms(2026, 7, 9, 23, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 7, 10, 23, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn free_busy_sends_utc_window_and_parses_busy() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .and(header("authorization", "Bearer tok"))
            .and(body_partial_json(json!({
                "timeMin": "2026-07-09T23:00:00Z",
                "timeMax": "2026-07-10T23:00:00Z",
                "timeZone": "Europe/London",
                "items": [{"id": "primary"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "calendars": {"primary": {"busy": [
                    {"start": "2026-07-10T08:00:00Z", "end": "2026-07-10T09:30:00+01:00"}
                ]}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let busy = client(&server).query_free_busy("tok", summer_window(), London).await.unwrap();

        assert_eq!(busy.len(), 1);
        assert_eq!(busy[0].start, Utc.with_ymd_and_hms(2026, 7, 10, 8, 0, 0).unwrap());
        assert_eq!(busy[0].end, Utc.with_ymd_and_hms(2026, 7, 10, 8, 30, 0).unwrap());
    }

    #[tokio::test]
    async fn free_busy_failure_is_an_error_and_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(500).set_body_string("backend"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(&server).query_free_busy("tok", summer_window(), London).await.unwrap_err();
        assert_eq!(err, BriefError::Upstream { status: 500, body: "backend".into() });
    }

    #[tokio::test]
    async fn free_busy_without_primary_entry_is_an_empty_day() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/freeBusy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "calendars": {} })))
            .mount(&server)
            .await;

        let busy = client(&server).query_free_busy("tok", summer_window(), London).await.unwrap();
        assert!(busy.is_empty());
    }

    #[tokio::test]
    async fn search_passes_query_parameters() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/calendars/primary/events"))
            .and(query_param("singleEvents", "true"))
            .and(query_param("q", "Brief - Weekly Update"))
            .and(query_param("timeMin", "2026-07-09T23:00:00Z"))
            .and(query_param("timeZone", "Europe/London"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "a", "summary": "Brief - Weekly Update", "start": {"dateTime": "2026-07-10T12:00:00+01:00"}},
                    {"id": "b", "start": {"date": "2026-07-10"}}
                ]
            })))
            .mount(&server)
            .await;

        let events = client(&server)
            .search_events("tok", summer_window(), London, "Brief - Weekly Update")
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].start.as_deref(), Some("2026-07-10T12:00:00+01:00"));
        assert_eq!(events[1].summary, None);
        assert_eq!(events[1].start.as_deref(), Some("2026-07-10"));
    }

    #[tokio::test]
    async fn create_sends_local_wall_clock_with_zone() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/calendars/primary/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "evt_42",
                "start": {"dateTime": "2026-07-10T12:00:00+01:00"}
            })))
            .mount(&server)
            .await;

        let day = NaiveDate::from_ymd_opt(2026, 7, 10).unwrap();
        let event = NewCalendarEvent {
            summary: "Brief - Weekly Update".into(),
            description: "Fill it in".into(),
            slot: ReminderSlot {
                start: day.and_hms_opt(12, 0, 0).unwrap(),
                end: day.and_hms_opt(12, 15, 0).unwrap(),
            },
            time_zone: London,
            popup_minutes: 0,
        };

        let created = client(&server).create_event("tok", &event).await.unwrap();
        assert_eq!(created.event_id, "evt_42");
        assert_eq!(created.start_time.as_deref(), Some("2026-07-10T12:00:00+01:00"));

        let requests = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["start"], json!({"dateTime": "2026-07-10T12:00:00", "timeZone": "Europe/London"}));
        assert_eq!(body["end"]["dateTime"], "2026-07-10T12:15:00");
        assert_eq!(
            body["reminders"],
            json!({"useDefault": false, "overrides": [{"method": "popup", "minutes": 0}]})
        );
    }
}
