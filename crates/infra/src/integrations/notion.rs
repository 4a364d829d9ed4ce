//! Notion adapter
//!
//! The weekly-report database doubles as the submission ledger: one page per
//! report, queried by `Submitted At` to find who has checked in this week.

use async_trait::async_trait;
use brief_core::time::{local_date, week_of};
use brief_core::{ReportPublisher, SubmissionSource};
use brief_domain::{PublishedReport, Report, Result};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use chrono_tz::Tz;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::errors::status_error;
use crate::http::HttpClient;

const NOTION_PAGE_BASE: &str = "https://notion.so/";

/// Notion weekly-report database client.
pub struct NotionClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    version: String,
    database_id: String,
    timezone: Tz,
}

impl NotionClient {
    /// Client for `database_id`; dates are read in `timezone`.
    pub fn new(
        base_url: impl Into<String>,
        version: impl Into<String>,
        api_key: impl Into<String>,
        database_id: impl Into<String>,
        timezone: Tz,
        http: HttpClient,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            version: version.into(),
            database_id: database_id.into(),
            timezone,
        }
    }

    fn post(&self, path: &str, body: &Value) -> Result<RequestBuilder> {
        let mut headers = HeaderMap::new();
        let version = HeaderValue::from_str(&self.version).map_err(|_| {
            brief_domain::BriefError::Config(format!("invalid Notion-Version '{}'", self.version))
        })?;
        headers.insert("Notion-Version", version);

        Ok(self
            .http
            .request(Method::POST, format!("{}{path}", self.base_url))
            .bearer_auth(&self.api_key)
            .headers(headers)
            .json(body))
    }

    /// Send and decode, surfacing Notion's own `message` on failure.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = self
            .http
            .send_checked_with(builder, |status, raw| {
                let message = serde_json::from_str::<NotionErrorBody>(&raw)
                    .ok()
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| format!("Notion API error: {}", status.as_u16()));
                status_error(status, message)
            })
            .await?;

        response.json::<T>().await.map_err(|err| crate::errors::InfraError::from(err).into())
    }
}

#[async_trait]
impl SubmissionSource for NotionClient {
    #[instrument(skip(self))]
    async fn submitted_emails(&self, week_of: NaiveDate) -> Result<Vec<String>> {
        let path = format!("/databases/{}/query", self.database_id);
        let mut emails = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({
                "filter": {
                    "property": "Submitted At",
                    "date": { "on_or_after": week_of.to_string() }
                }
            });
            if let Some(next) = &cursor {
                body["start_cursor"] = json!(next);
            }

            let page: QueryResponse = self.send(self.post(&path, &body)?).await?;
            emails.extend(page.results.iter().flat_map(SubmissionPage::emails));

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!(submissions = emails.len(), "Submissions collected");
        Ok(emails)
    }
}

#[async_trait]
impl ReportPublisher for NotionClient {
    #[instrument(skip(self, report, user_email), fields(status = report.status.as_str()))]
    async fn publish(
        &self,
        report: &Report,
        user_email: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> Result<PublishedReport> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": page_properties(report, user_email, submitted_at, self.timezone),
            "children": page_blocks(report),
        });

        let created: CreatedPage = self.send(self.post("/pages", &body)?).await?;
        let url = format!("{NOTION_PAGE_BASE}{}", created.id.replace('-', ""));
        info!(page_id = %created.id, "Report published");

        Ok(PublishedReport { success: true, page_id: created.id, url })
    }
}

fn page_properties(
    report: &Report,
    user_email: Option<&str>,
    submitted_at: DateTime<Utc>,
    tz: Tz,
) -> Value {
    let today = local_date(submitted_at, tz);
    let title = format!("Weekly Update - {}", today.format("%B %-d, %Y"));

    let mut properties = Map::new();
    properties.insert("Name".into(), json!({ "title": [{ "text": { "content": title } }] }));
    properties.insert("Status".into(), json!({ "select": { "name": report.status.label() } }));
    properties.insert("Week Of".into(), json!({ "date": { "start": week_of(today).to_string() } }));
    properties.insert(
        "Submitted At".into(),
        json!({ "date": { "start": submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true) } }),
    );
    if let Some(email) = user_email.filter(|e| !e.is_empty()) {
        properties.insert("Person".into(), json!({ "email": email }));
    }

    Value::Object(properties)
}

fn page_blocks(report: &Report) -> Vec<Value> {
    let mut blocks = vec![json!({
        "object": "block",
        "type": "callout",
        "callout": {
            "rich_text": rich_text(&report.tldr),
            "icon": { "type": "emoji", "emoji": "📋" }
        }
    })];

    blocks.push(text_block("heading_2", "Done This Week"));
    blocks.extend(report.this_week.iter().map(|item| text_block("bulleted_list_item", item)));

    blocks.push(text_block("heading_2", "Challenges"));
    if report.challenges.is_empty() {
        blocks.push(text_block("paragraph", "No challenges this week."));
    } else {
        blocks.extend(report.challenges.iter().map(|item| text_block("bulleted_list_item", item)));
    }

    blocks.push(text_block("heading_2", "Next Week"));
    blocks.extend(report.next_week.iter().map(|item| text_block("bulleted_list_item", item)));

    for (heading, value, fallback) in [
        ("Current Status", &report.current_status, "No update"),
        ("Dependencies", &report.dependencies, "None"),
        ("Support Required", &report.support_required, "None"),
        ("Vibe Check", &report.vibe, "No concerns"),
    ] {
        blocks.push(text_block("heading_2", heading));
        blocks.push(text_block("paragraph", or_default(value, fallback)));
    }

    blocks
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

fn text_block(kind: &str, content: &str) -> Value {
    let mut block = Map::new();
    block.insert("object".into(), json!("block"));
    block.insert("type".into(), json!(kind));
    block.insert(kind.into(), json!({ "rich_text": rich_text(content) }));
    Value::Object(block)
}

#[derive(Debug, Deserialize)]
struct NotionErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<SubmissionPage>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmissionPage {
    #[serde(default)]
    properties: SubmissionProperties,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionProperties {
    #[serde(rename = "Person")]
    person: Option<PersonProperty>,
}

#[derive(Debug, Deserialize)]
struct PersonProperty {
    email: Option<String>,
    #[serde(default)]
    people: Vec<PersonEntry>,
}

#[derive(Debug, Deserialize)]
struct PersonEntry {
    person: Option<PersonDetail>,
}

#[derive(Debug, Deserialize)]
struct PersonDetail {
    email: Option<String>,
}

impl SubmissionPage {
    /// Emails from both the plain `email` property shape and the `people`
    /// shape, lower-cased.
    fn emails(&self) -> Vec<String> {
        let Some(person) = &self.properties.person else {
            return Vec::new();
        };

        person
            .email
            .iter()
            .chain(
                person
                    .people
                    .iter()
                    .filter_map(|p| p.person.as_ref().and_then(|d| d.email.as_ref())),
            )
            .filter(|e| !e.is_empty())
            .map(|e| e.to_lowercase())
            .collect()
    }
}
