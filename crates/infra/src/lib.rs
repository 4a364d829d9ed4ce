//! # Brief Infrastructure
//!
//! Infrastructure implementations of the core ports.
//!
//! This crate contains:
//! - The shared HTTP client (retry, timeouts, status mapping)
//! - Service adapters: Google Calendar, Clerk, LLM gateway, Notion, Slack
//! - Configuration loading (file + environment)
//! - Cron schedulers for the weekly jobs
//!
//! ## Architecture
//! - Implements traits defined in `brief-core`
//! - Contains all "impure" code (network I/O, environment, clocks)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod scheduling;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::{
    ClerkClient, GoogleCalendarClient, LlmGatewayClient, NotionClient, SlackWebhook,
};
pub use scheduling::{CronScheduler, CronSchedulerConfig, ReminderBatchJob, ShameBotJob};
