//! Cron-driven task runner
//!
//! Wraps `tokio-cron-scheduler` with an explicit lifecycle: jobs are
//! registered on `start`, every run is bounded by a timeout, and `stop`
//! cancels the monitor task and waits for it. Cron expressions carry a
//! seconds field and are evaluated in the configured timezone, not the
//! host's.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use brief_domain::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::error::{SchedulerError, SchedulerResult};

/// Unit of work triggered by the scheduler
#[async_trait]
pub trait ScheduledTask: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    async fn run(&self, now: DateTime<Utc>) -> Result<()>;
}

/// Configuration for a [`CronScheduler`].
#[derive(Debug, Clone)]
pub struct CronSchedulerConfig {
    /// Six-field cron expressions (with seconds); the task runs on each.
    pub cron_expressions: Vec<String>,
    pub timezone: Tz,
    /// Timeout applied to a single task execution.
    pub job_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
    pub join_timeout: Duration,
}

impl CronSchedulerConfig {
    /// One job per cron expression, evaluated in `timezone`.
    pub fn new(cron_expressions: Vec<String>, timezone: Tz) -> Self {
        Self {
            cron_expressions,
            timezone,
            job_timeout: Duration::from_secs(300),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }

    /// Cap each run at `timeout`.
    #[must_use]
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }
}

/// Runs one [`ScheduledTask`] on a set of cron schedules.
pub struct CronScheduler {
    scheduler: Option<JobScheduler>,
    config: CronSchedulerConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    task: Arc<dyn ScheduledTask>,
}

impl CronScheduler {
    /// Scheduler for `task`; nothing runs until [`start`](Self::start).
    pub fn new(config: CronSchedulerConfig, task: Arc<dyn ScheduledTask>) -> Self {
        Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            task,
        }
    }

    /// Register every schedule and start ticking.
    #[instrument(skip(self), fields(task = self.task.name()))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|source| SchedulerError::Timeout { duration: start_timeout, source })?
            .map_err(|source| SchedulerError::StartFailed { source })?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        let name = self.task.name();
        self.monitor_handle = Some(tokio::spawn(async move {
            cancel.cancelled().await;
            debug!(task = name, "Scheduler monitor cancelled");
        }));

        info!(
            schedules = self.config.cron_expressions.len(),
            timezone = %self.config.timezone,
            "Scheduler started"
        );
        Ok(())
    }

    /// Shut the scheduler down and wait for the monitor task to finish.
    #[instrument(skip(self), fields(task = self.task.name()))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move { scheduler.shutdown().await })
            .await
            .map_err(|source| SchedulerError::Timeout { duration: stop_timeout, source })?
            .map_err(|source| SchedulerError::StopFailed { source })?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Scheduler stopped");
        self.cancellation = CancellationToken::new();
        Ok(())
    }

    /// Whether the scheduler has been started and not stopped.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Run the task once, outside the schedule, with the same timeout.
    pub async fn run_now(&self, now: DateTime<Utc>) -> SchedulerResult<()> {
        execute(self.task.as_ref(), now, self.config.job_timeout).await
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler =
            JobScheduler::new().await.map_err(|source| SchedulerError::CreationFailed { source })?;

        for cron in &self.config.cron_expressions {
            let task = Arc::clone(&self.task);
            let job_timeout = self.config.job_timeout;

            let job = Job::new_async_tz(cron.as_str(), self.config.timezone, move |_id, _lock| {
                let task = Arc::clone(&task);
                Box::pin(async move {
                    // Failures are logged inside; the schedule keeps ticking.
                    let _ = execute(task.as_ref(), Utc::now(), job_timeout).await;
                })
            })
            .map_err(|source| SchedulerError::JobRegistrationFailed { cron: cron.clone(), source })?;

            let job_id = job.guid();
            scheduler.add(job).await.map_err(|source| SchedulerError::JobRegistrationFailed {
                cron: cron.clone(),
                source,
            })?;
            debug!(%cron, %job_id, task = self.task.name(), "Registered job");
        }

        Ok(scheduler)
    }
}

async fn execute(
    task: &dyn ScheduledTask,
    now: DateTime<Utc>,
    job_timeout: Duration,
) -> SchedulerResult<()> {
    let started = Instant::now();
    let name = task.name();
    debug!(task = name, "Job invoked");

    match tokio::time::timeout(job_timeout, task.run(now)).await {
        Ok(Ok(())) => {
            info!(task = name, duration_ms = elapsed_ms(started), "Job finished");
            Ok(())
        }
        Ok(Err(err)) => {
            error!(task = name, error = %err, kind = err.label(), duration_ms = elapsed_ms(started), "Job failed");
            Err(err.into())
        }
        Err(source) => {
            warn!(task = name, timeout_secs = job_timeout.as_secs(), "Job timed out");
            Err(SchedulerError::Timeout { duration: job_timeout, source })
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

impl Drop for CronScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!(task = self.task.name(), "CronScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
