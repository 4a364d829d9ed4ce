//! Scheduled tasks for the weekly reminder batch and the shame bot

use std::sync::Arc;

use async_trait::async_trait;
use brief_core::{ReminderBatch, ShameBot};
use brief_domain::Result;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::cron::ScheduledTask;

/// Creates this week's reminder for every user in the directory.
pub struct ReminderBatchJob {
    batch: Arc<ReminderBatch>,
}

impl ReminderBatchJob {
    /// Wrap the batch as a cron task.
    pub fn new(batch: Arc<ReminderBatch>) -> Self {
        Self { batch }
    }
}

#[async_trait]
impl ScheduledTask for ReminderBatchJob {
    fn name(&self) -> &'static str {
        "calendar_reminders"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<()> {
        let report = self.batch.run(now).await?;

        for outcome in &report.results {
            debug!(
                user = %redact_email(&outcome.email),
                scheduled = outcome.calendar.is_scheduled(),
                reason = outcome.calendar.reason().map(|r| r.as_str()),
                "Reminder outcome"
            );
        }

        info!(
            processed = report.processed,
            scheduled = report.scheduled,
            skipped = report.skipped,
            "Reminder batch completed"
        );
        Ok(())
    }
}

/// Posts the weekly escalation message.
pub struct ShameBotJob {
    bot: Arc<ShameBot>,
}

impl ShameBotJob {
    /// Wrap the bot as a cron task.
    pub fn new(bot: Arc<ShameBot>) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ScheduledTask for ShameBotJob {
    fn name(&self) -> &'static str {
        "shame_bot"
    }

    async fn run(&self, now: DateTime<Utc>) -> Result<()> {
        let outcome = self.bot.run(now).await?;
        let users: Vec<String> = outcome.delinquents.iter().map(|e| redact_email(e)).collect();
        info!(
            level = outcome.level.map(|l| l.as_str()),
            delinquents = users.len(),
            users = ?users,
            "Shame bot posted"
        );
        Ok(())
    }
}

/// Stable, non-reversible tag for an email address in logs.
pub(crate) fn redact_email(email: &str) -> String {
    const EMAIL_HASH_SALT: &[u8] = b"brief-scheduler-email-salt";
    let mut hasher = Sha256::new();
    hasher.update(EMAIL_HASH_SALT);
    hasher.update(email.trim().to_lowercase().as_bytes());
    let digest = hasher.finalize();
    format!("email_hash={}", hex::encode(&digest[..8]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_redaction_is_deterministic_and_case_blind() {
        assert_eq!(redact_email("user@example.com"), redact_email("User@Example.com "));
    }

    #[test]
    fn email_redaction_masks_local_part() {
        let token = redact_email("sensitive@example.com");
        assert!(token.starts_with("email_hash="));
        assert!(!token.contains("sensitive"));
        assert_eq!(token.len(), "email_hash=".len() + 16);
    }
}
