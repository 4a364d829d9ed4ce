//! Weekly reminder batch over every user in the directory

use std::sync::Arc;

use brief_domain::constants::USER_LIST_LIMIT;
use brief_domain::{ReminderBatchReport, Result};
use chrono::{DateTime, Utc};
use tracing::instrument;

use super::ports::UserDirectory;
use super::service::ReminderScheduler;

/// Lists users and runs the scheduler for each of them
pub struct ReminderBatch {
    scheduler: Arc<ReminderScheduler>,
    directory: Arc<dyn UserDirectory>,
}

impl ReminderBatch {
    /// Batch over the users `directory` lists.
    pub fn new(scheduler: Arc<ReminderScheduler>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { scheduler, directory }
    }

    /// Failing to list users fails the run; per-user failures do not.
    #[instrument(skip(self))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ReminderBatchReport> {
        let users = self.directory.list_users(USER_LIST_LIMIT).await?;
        Ok(self.scheduler.run_batch(&users, now).await)
    }
}
