//! Command-line surface of the `brief` binary

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use brief_core::normalize_report;
use brief_core::ReportPublisher;
use brief_domain::Report;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::context::AppContext;

/// Command-line arguments for the `brief` binary.
#[derive(Debug, Parser)]
#[command(
    name = "brief",
    about = "Weekly check-in reminders, report generation and the shame bot",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Config file (TOML or JSON); overrides `BRIEF_CONFIG` and probing
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands; `serve` runs when none is given.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the cron schedulers until interrupted (default)
    Serve,

    /// Schedule this week's reminder for one user, or for every user
    Remind {
        /// Identity-provider user id; omit to run the whole batch
        #[arg(long)]
        user: Option<String>,
    },

    /// Show this week's reminder for a user without creating anything
    Status {
        #[arg(long)]
        user: String,
    },

    /// Run the shame bot once, now
    Shame,

    /// Normalise a raw report JSON document (stdin when no file is given)
    Normalize { file: Option<PathBuf> },

    /// Generate a report from a transcript or from check-in responses
    Generate {
        /// Plain-text transcript of the check-in
        #[arg(long, conflicts_with = "responses", required_unless_present = "responses")]
        transcript: Option<PathBuf>,

        /// JSON object of question id to answer
        #[arg(long)]
        responses: Option<PathBuf>,

        /// Also create the Notion page
        #[arg(long)]
        publish: bool,

        /// Person to attribute the Notion page to
        #[arg(long, requires = "publish")]
        email: Option<String>,
    },

    /// Apply a free-text edit instruction to an existing report
    Refine {
        #[arg(long)]
        report: PathBuf,

        #[arg(long)]
        instruction: String,
    },
}

/// Execute a parsed command.
pub async fn run(command: Command, ctx: &AppContext) -> anyhow::Result<()> {
    match command {
        Command::Serve => serve(ctx).await,
        Command::Remind { user: Some(user) } => {
            let result = ctx.reminder_scheduler()?.schedule_reminder(&user).await?;
            emit(&result)
        }
        Command::Remind { user: None } => emit(&ctx.reminder_batch()?.run(Utc::now()).await?),
        Command::Status { user } => {
            emit(&ctx.reminder_scheduler()?.reminder_status(&user, Utc::now()).await?)
        }
        Command::Shame => emit(&ctx.shame_bot()?.run(Utc::now()).await?),
        Command::Normalize { file } => {
            let raw: Value = serde_json::from_str(&read_input(file.as_deref())?)
                .context("input is not valid JSON")?;
            emit(&normalize_report(&raw))
        }
        Command::Generate { transcript, responses, publish, email } => {
            let generator = ctx.report_generator()?;
            let report = match (transcript, responses) {
                (Some(path), _) => generator.generate_from_transcript(&read_file(&path)?).await?,
                (None, Some(path)) => {
                    let answers: HashMap<String, String> = serde_json::from_str(&read_file(&path)?)
                        .context("responses must be a JSON object of strings")?;
                    generator.generate_from_responses(&answers).await?
                }
                (None, None) => bail!("either --transcript or --responses is required"),
            };

            if publish {
                let published = ctx
                    .report_publisher()?
                    .publish(&report, email.as_deref(), Utc::now())
                    .await?;
                emit(&json!({ "report": report, "notion": published }))
            } else {
                emit(&report)
            }
        }
        Command::Refine { report, instruction } => {
            let current: Report = serde_json::from_str(&read_file(&report)?)
                .with_context(|| format!("{} is not a report", report.display()))?;
            emit(&ctx.report_generator()?.refine(&current, &instruction).await?)
        }
    }
}

async fn serve(ctx: &AppContext) -> anyhow::Result<()> {
    let mut schedulers = ctx.schedulers()?;
    for scheduler in &mut schedulers {
        scheduler.start().await?;
    }
    info!(timezone = %ctx.config.timezone, "Brief scheduler running; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;
    info!("Shutdown requested");

    for scheduler in &mut schedulers {
        if let Err(err) = scheduler.stop().await {
            error!(error = %err, "Scheduler did not stop cleanly");
        }
    }
    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => read_file(path),
        None => std::io::read_to_string(std::io::stdin()).context("failed to read stdin"),
    }
}

#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use brief_domain::Config;

    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["brief"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn generate_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["brief", "generate"]).is_err());
        assert!(Cli::try_parse_from([
            "brief", "generate", "--transcript", "a.txt", "--responses", "b.json"
        ])
        .is_err());
        assert!(Cli::try_parse_from(["brief", "generate", "--transcript", "a.txt"]).is_ok());
    }

    #[test]
    fn email_requires_publish() {
        assert!(Cli::try_parse_from([
            "brief", "generate", "--transcript", "a.txt", "--email", "a@example.com"
        ])
        .is_err());
    }

    #[test]
    fn remind_takes_optional_user_and_global_config() {
        let cli =
            Cli::try_parse_from(["brief", "remind", "--user", "user_1", "--config", "brief.toml"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("brief.toml")));
        assert!(matches!(cli.command, Some(Command::Remind { user: Some(ref u) }) if u == "user_1"));
    }

    #[tokio::test]
    async fn normalize_runs_without_any_secrets() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(br#"{"summary": "Shipped", "done": ["a"], "Status": "At Risk"}"#).unwrap();

        let ctx = AppContext::new(Config::default()).unwrap();
        run(Command::Normalize { file: Some(file.path().to_path_buf()) }, &ctx).await.unwrap();
    }

    #[tokio::test]
    async fn refine_rejects_non_report_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        let ctx = AppContext::new(Config::default()).unwrap();
        let err = run(
            Command::Refine { report: file.path().to_path_buf(), instruction: "shorter".into() },
            &ctx,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("is not a report"));
    }
}
