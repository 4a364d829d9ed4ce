//! Application context - dependency wiring
//!
//! Adapters are built on demand so that a command only needs the secrets of
//! the services it actually talks to.

use std::sync::Arc;
use std::time::Duration;

use brief_core::{ReminderBatch, ReminderScheduler, ReportGenerator, ShameBot};
use brief_domain::{Config, Result};
use brief_infra::{
    ClerkClient, CronScheduler, CronSchedulerConfig, GoogleCalendarClient, HttpClient,
    LlmGatewayClient, NotionClient, ReminderBatchJob, ShameBotJob, SlackWebhook,
};

const LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Application context - holds the configuration and the shared HTTP clients
pub struct AppContext {
    pub config: Config,
    /// Retries transport errors and 5xx; for idempotent calls.
    http: HttpClient,
    /// Single attempt; for calls that must never be replayed.
    http_once: HttpClient,
    llm_http: HttpClient,
}

impl AppContext {
    /// Build the shared HTTP clients for `config`.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            http: HttpClient::builder().build()?,
            http_once: HttpClient::builder().max_attempts(1).build()?,
            llm_http: HttpClient::builder().timeout(LLM_TIMEOUT).build()?,
        })
    }

    fn clerk(&self) -> Result<Arc<ClerkClient>> {
        let secret = self.config.secrets.clerk_secret_key()?;
        Ok(Arc::new(ClerkClient::new(
            self.config.services.clerk_api.clone(),
            secret,
            self.http.clone(),
        )))
    }

    fn notion(&self) -> Result<Arc<NotionClient>> {
        let secrets = &self.config.secrets;
        Ok(Arc::new(NotionClient::new(
            self.config.services.notion_api.clone(),
            self.config.services.notion_version.clone(),
            secrets.notion_api_key()?,
            secrets.notion_database_id()?,
            self.config.timezone,
            self.http.clone(),
        )))
    }

    fn llm(&self) -> Result<Arc<LlmGatewayClient>> {
        let base = self.config.secrets.llm_gateway_url()?;
        Ok(Arc::new(LlmGatewayClient::new(base, self.llm_http.clone())))
    }

    /// Calendar reminder scheduler on Clerk and Google Calendar.
    pub fn reminder_scheduler(&self) -> Result<Arc<ReminderScheduler>> {
        let google = Arc::new(GoogleCalendarClient::new(
            self.config.services.google_calendar.clone(),
            self.http_once.clone(),
        ));
        let scheduler = ReminderScheduler::new(
            self.clerk()?,
            google,
            self.config.calendar.clone(),
            self.config.timezone,
        )?;
        Ok(Arc::new(scheduler))
    }

    /// Reminder batch over every Clerk user.
    pub fn reminder_batch(&self) -> Result<Arc<ReminderBatch>> {
        Ok(Arc::new(ReminderBatch::new(self.reminder_scheduler()?, self.clerk()?)))
    }

    /// Shame bot wired to Notion, the LLM gateway and Slack.
    pub fn shame_bot(&self) -> Result<Arc<ShameBot>> {
        let slack = Arc::new(SlackWebhook::new(
            self.config.secrets.slack_webhook_url()?,
            self.http_once.clone(),
        ));
        Ok(Arc::new(ShameBot::new(
            self.notion()?,
            self.llm()?,
            slack,
            self.config.team.clone(),
            self.config.escalation.policy,
            self.config.timezone,
        )))
    }

    /// Report generator on the LLM gateway.
    pub fn report_generator(&self) -> Result<ReportGenerator> {
        Ok(ReportGenerator::new(self.llm()?))
    }

    /// Notion publisher for finished reports.
    pub fn report_publisher(&self) -> Result<Arc<NotionClient>> {
        self.notion()
    }

    /// Cron schedulers for the reminder batch and the shame bot, not yet
    /// started.
    pub fn schedulers(&self) -> Result<Vec<CronScheduler>> {
        let schedule = &self.config.schedule;
        let timeout = Duration::from_secs(schedule.job_timeout_secs.max(1));

        let reminders = CronScheduler::new(
            CronSchedulerConfig::new(vec![schedule.calendar_reminders.clone()], self.config.timezone)
                .with_job_timeout(timeout),
            Arc::new(ReminderBatchJob::new(self.reminder_batch()?)),
        );
        let shame = CronScheduler::new(
            CronSchedulerConfig::new(schedule.shame_bot.clone(), self.config.timezone)
                .with_job_timeout(timeout),
            Arc::new(ShameBotJob::new(self.shame_bot()?)),
        );

        Ok(vec![reminders, shame])
    }
}
