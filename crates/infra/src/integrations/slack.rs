//! Slack incoming-webhook notifier

use async_trait::async_trait;
use brief_core::Notifier;
use brief_domain::Result;
use reqwest::Method;
use serde_json::json;
use tracing::info;

use crate::http::HttpClient;

/// Slack incoming-webhook notifier.
pub struct SlackWebhook {
    http: HttpClient,
    webhook_url: String,
}

impl SlackWebhook {
    /// Notifier posting to `webhook_url`.
    pub fn new(webhook_url: impl Into<String>, http: HttpClient) -> Self {
        Self { http, webhook_url: webhook_url.into() }
    }
}

#[async_trait]
impl Notifier for SlackWebhook {
    async fn post_message(&self, text: &str) -> Result<()> {
        let request =
            self.http.request(Method::POST, &self.webhook_url).json(&json!({ "text": text }));
        self.http.send_checked(request).await?;
        info!(chars = text.len(), "Slack message posted");
        Ok(())
    }
}
