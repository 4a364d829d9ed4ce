//! Escalation engine port interfaces

use async_trait::async_trait;
use brief_domain::Result;
use chrono::NaiveDate;

/// Where this week's submissions are recorded
#[async_trait]
pub trait SubmissionSource: Send + Sync {
    /// Lower-cased emails of everyone who submitted on or after `week_of`.
    async fn submitted_emails(&self, week_of: NaiveDate) -> Result<Vec<String>>;
}

/// Team chat delivery
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn post_message(&self, text: &str) -> Result<()>;
}
