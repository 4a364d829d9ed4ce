//! Shared test helpers for `brief-core` integration tests.
//!
//! In-memory fakes for every port so tests can script provider answers and
//! inspect what the services sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use brief_core::{
    AccessTokenProvider, CalendarApi, CompletionGateway, Notifier, SubmissionSource,
    UserDirectory,
};
use brief_domain::{
    BriefError, BusyInterval, CalendarEventSummary, CompletionRequest, CompletionResponse,
    CreatedEvent, NewCalendarEvent, Result, TimeWindow, UserRecord,
};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// Token provider answering from a fixed table. Unknown users have no token.
#[derive(Default)]
pub struct FakeTokens {
    answers: HashMap<String, Result<Option<String>>>,
}

impl FakeTokens {
    pub fn with_token(mut self, user_id: &str, token: &str) -> Self {
        self.answers.insert(user_id.to_string(), Ok(Some(token.to_string())));
        self
    }

    pub fn with_failure(mut self, user_id: &str) -> Self {
        self.answers
            .insert(user_id.to_string(), Err(BriefError::Network("identity provider down".into())));
        self
    }
}

#[async_trait]
impl AccessTokenProvider for FakeTokens {
    async fn oauth_access_token(&self, user_id: &str, _provider: &str) -> Result<Option<String>> {
        self.answers.get(user_id).cloned().unwrap_or(Ok(None))
    }
}

#[derive(Default)]
struct CalendarState {
    events: Vec<CalendarEventSummary>,
    busy: Vec<BusyInterval>,
    created: Vec<NewCalendarEvent>,
    searches: Vec<TimeWindow>,
    fail_search: bool,
    fail_free_busy: bool,
    fail_create: bool,
}

/// Calendar provider keeping created events so later searches see them.
#[derive(Default, Clone)]
pub struct FakeCalendar {
    state: Arc<Mutex<CalendarState>>,
}

impl FakeCalendar {
    pub fn with_busy(self, busy: Vec<BusyInterval>) -> Self {
        self.state.lock().unwrap().busy = busy;
        self
    }

    pub fn with_event(self, id: &str, summary: &str, start: &str) -> Self {
        self.state.lock().unwrap().events.push(CalendarEventSummary {
            id: id.to_string(),
            summary: Some(summary.to_string()),
            start: Some(start.to_string()),
        });
        self
    }

    pub fn failing_search(self) -> Self {
        self.state.lock().unwrap().fail_search = true;
        self
    }

    pub fn failing_free_busy(self) -> Self {
        self.state.lock().unwrap().fail_free_busy = true;
        self
    }

    pub fn failing_create(self) -> Self {
        self.state.lock().unwrap().fail_create = true;
        self
    }

    pub fn created(&self) -> Vec<NewCalendarEvent> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn searches(&self) -> Vec<TimeWindow> {
        self.state.lock().unwrap().searches.clone()
    }
}

#[async_trait]
impl CalendarApi for FakeCalendar {
    async fn query_free_busy(
        &self,
        _access_token: &str,
        _window: TimeWindow,
        _time_zone: Tz,
    ) -> Result<Vec<BusyInterval>> {
        let state = self.state.lock().unwrap();
        if state.fail_free_busy {
            return Err(BriefError::Upstream { status: 500, body: "freeBusy".into() });
        }
        Ok(state.busy.clone())
    }

    async fn search_events(
        &self,
        _access_token: &str,
        window: TimeWindow,
        _time_zone: Tz,
        _query: &str,
    ) -> Result<Vec<CalendarEventSummary>> {
        let mut state = self.state.lock().unwrap();
        state.searches.push(window);
        if state.fail_search {
            return Err(BriefError::Upstream { status: 403, body: "events".into() });
        }
        Ok(state.events.clone())
    }

    async fn create_event(
        &self,
        _access_token: &str,
        event: &NewCalendarEvent,
    ) -> Result<CreatedEvent> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create {
            return Err(BriefError::Upstream { status: 400, body: "invalid".into() });
        }
        let event_id = format!("evt_{}", state.created.len() + 1);
        let start = format!("{}+00:00", event.slot.start.format("%Y-%m-%dT%H:%M:%S"));
        state.created.push(event.clone());
        state.events.push(CalendarEventSummary {
            id: event_id.clone(),
            summary: Some(event.summary.clone()),
            start: Some(start.clone()),
        });
        Ok(CreatedEvent { event_id, start_time: Some(start) })
    }
}

/// Fixed user listing
pub struct FakeDirectory(pub Vec<UserRecord>);

#[async_trait]
impl UserDirectory for FakeDirectory {
    async fn list_users(&self, _limit: u32) -> Result<Vec<UserRecord>> {
        Ok(self.0.clone())
    }
}

pub fn user(id: &str, email: &str) -> UserRecord {
    UserRecord { id: id.to_string(), email: Some(email.to_string()) }
}

/// Submission source returning a fixed list and recording the week asked for
#[derive(Default)]
pub struct FakeSubmissions {
    emails: Vec<String>,
    fail: bool,
    pub asked: Mutex<Vec<NaiveDate>>,
}

impl FakeSubmissions {
    pub fn new(emails: &[&str]) -> Self {
        Self { emails: emails.iter().map(|e| e.to_string()).collect(), ..Self::default() }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }
}

#[async_trait]
impl SubmissionSource for FakeSubmissions {
    async fn submitted_emails(&self, week_of: NaiveDate) -> Result<Vec<String>> {
        self.asked.lock().unwrap().push(week_of);
        if self.fail {
            return Err(BriefError::Upstream { status: 502, body: "notion".into() });
        }
        Ok(self.emails.clone())
    }
}

/// Notifier that records every posted message
#[derive(Default)]
pub struct RecordingNotifier {
    pub posted: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn post_message(&self, text: &str) -> Result<()> {
        self.posted.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// LLM gateway answering with a fixed completion and recording requests
pub struct ScriptedLlm {
    content: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedLlm {
    pub fn answering(content: &str) -> Self {
        Self { content: content.to_string(), requests: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl CompletionGateway for ScriptedLlm {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(CompletionResponse { content: self.content.clone(), usage: serde_json::Value::Null })
    }
}
