//! Report publishing port

use async_trait::async_trait;
use brief_domain::{PublishedReport, Report, Result};
use chrono::{DateTime, Utc};

/// Destination for finished reports (a Notion database in production)
#[async_trait]
pub trait ReportPublisher: Send + Sync {
    async fn publish(
        &self,
        report: &Report,
        user_email: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> Result<PublishedReport>;
}
