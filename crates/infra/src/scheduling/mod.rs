//! Cron scheduling for the weekly jobs
//!
//! Every scheduler here follows the same runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on every job run
//! - Cron expressions evaluated in the team timezone

pub mod cron;
pub mod error;
pub mod jobs;

pub use cron::{CronScheduler, CronSchedulerConfig, ScheduledTask};
pub use error::{SchedulerError, SchedulerResult};
pub use jobs::{ReminderBatchJob, ShameBotJob};
