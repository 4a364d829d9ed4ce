//! Configuration loader
//!
//! Builds [`Config`] from an optional file and the process environment.
//!
//! ## Loading Strategy
//! 1. `BRIEF_CONFIG` names a file explicitly; otherwise standard paths are
//!    probed
//! 2. Without a file, built-in defaults are used
//! 3. Environment variables are applied last and win over file values
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `BRIEF_CONFIG`: Config file path
//! - `BRIEF_TIMEZONE`: IANA zone for all wall-clock arithmetic
//! - `BRIEF_SLOT_MINUTES`: Reminder length in minutes
//! - `BRIEF_IDEMPOTENCY`: `best_effort` or `per_user_lock`
//! - `BRIEF_ESCALATION`: `two_tier` or `three_tier`
//! - `BRIEF_CALENDAR_CRON`: Cron expression for the reminder batch
//! - `BRIEF_JOB_TIMEOUT_SECS`: Per-run timeout for scheduled jobs
//! - `BRIEF_TEAM`: Roster as `email:Name` pairs separated by commas
//! - `BRIEF_LOG_LEVEL`, `BRIEF_LOG_JSON`: Logging fallbacks
//! - `CLERK_SECRET_KEY`, `LLM_GATEWAY_URL`, `NOTION_API_KEY`,
//!   `NOTION_DATABASE_ID`, `SLACK_WEBHOOK_URL`: Secrets
//!
//! ## File Locations
//! The loader probes `brief.toml`, `brief.json`, `config.toml` and
//! `config.json` in the working directory, then next to the executable.

use std::path::{Path, PathBuf};

use brief_domain::{
    BriefError, Config, EscalationPolicy, IdempotencyMode, Result, TeamMember,
};
use chrono_tz::Tz;

const CONFIG_FILE_NAMES: [&str; 4] = ["brief.toml", "brief.json", "config.toml", "config.json"];

/// Load configuration: file (explicit or probed) or defaults, then the
/// environment on top.
///
/// # Errors
/// Returns `BriefError::Config` if:
/// - `BRIEF_CONFIG` points at a missing file
/// - File format is invalid
/// - An environment variable holds an unparseable value
pub fn load() -> Result<Config> {
    load_with(std::env::var("BRIEF_CONFIG").ok().map(PathBuf::from))
}

/// [`load`] with an explicit file taking the place of `BRIEF_CONFIG`.
///
/// # Errors
/// Same as [`load`].
pub fn load_with(explicit: Option<PathBuf>) -> Result<Config> {
    let base = match explicit.or_else(probe_config_paths) {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            Config::default()
        }
    };

    let config = apply_env(base)?;
    tracing::info!(
        timezone = %config.timezone,
        team = config.team.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Defaults overlaid with environment variables only.
///
/// # Errors
/// Returns `BriefError::Config` if a variable holds an invalid value.
pub fn load_from_env() -> Result<Config> {
    apply_env(Config::default())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. Format is detected by
/// extension.
///
/// # Errors
/// Returns `BriefError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(BriefError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            BriefError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| BriefError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| BriefError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| BriefError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(BriefError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then next to the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn apply_env(mut config: Config) -> Result<Config> {
    if let Some(zone) = env_opt("BRIEF_TIMEZONE") {
        config.timezone = zone
            .parse::<Tz>()
            .map_err(|e| BriefError::Config(format!("Invalid BRIEF_TIMEZONE: {e}")))?;
    }

    if let Some(minutes) = env_opt("BRIEF_SLOT_MINUTES") {
        config.calendar.slot_minutes = minutes
            .parse::<u32>()
            .map_err(|e| BriefError::Config(format!("Invalid slot minutes: {e}")))?;
    }

    if let Some(mode) = env_opt("BRIEF_IDEMPOTENCY") {
        config.calendar.idempotency = match mode.to_ascii_lowercase().as_str() {
            "best_effort" => IdempotencyMode::BestEffort,
            "per_user_lock" => IdempotencyMode::PerUserLock,
            other => {
                return Err(BriefError::Config(format!("Invalid BRIEF_IDEMPOTENCY: {other}")))
            }
        };
    }

    if let Some(policy) = env_opt("BRIEF_ESCALATION") {
        config.escalation.policy = match policy.to_ascii_lowercase().as_str() {
            "two_tier" => EscalationPolicy::TwoTier,
            "three_tier" => EscalationPolicy::three_tier(),
            other => {
                return Err(BriefError::Config(format!("Invalid BRIEF_ESCALATION: {other}")))
            }
        };
    }

    if let Some(cron) = env_opt("BRIEF_CALENDAR_CRON") {
        config.schedule.calendar_reminders = cron;
    }

    if let Some(secs) = env_opt("BRIEF_JOB_TIMEOUT_SECS") {
        config.schedule.job_timeout_secs = secs
            .parse::<u64>()
            .map_err(|e| BriefError::Config(format!("Invalid job timeout: {e}")))?;
    }

    if let Some(team) = env_opt("BRIEF_TEAM") {
        config.team = parse_team(&team)?;
    }

    if let Some(level) = env_opt("BRIEF_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("BRIEF_LOG_JSON", config.logging.json);

    let secrets = &mut config.secrets;
    overlay(&mut secrets.clerk_secret_key, "CLERK_SECRET_KEY");
    overlay(&mut secrets.llm_gateway_url, "LLM_GATEWAY_URL");
    overlay(&mut secrets.notion_api_key, "NOTION_API_KEY");
    overlay(&mut secrets.notion_database_id, "NOTION_DATABASE_ID");
    overlay(&mut secrets.slack_webhook_url, "SLACK_WEBHOOK_URL");

    Ok(config)
}

/// Parse `email:Name,email:Name`. A bare email uses its local part as name.
fn parse_team(raw: &str) -> Result<Vec<TeamMember>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (email, name) = match entry.split_once(':') {
                Some((email, name)) => (email.trim(), name.trim()),
                None => (entry, entry.split('@').next().unwrap_or(entry)),
            };
            if !email.contains('@') {
                return Err(BriefError::Config(format!("Invalid BRIEF_TEAM entry: {entry}")));
            }
            Ok(TeamMember::new(email, name))
        })
        .collect()
}

fn overlay(slot: &mut Option<String>, key: &str) {
    if let Some(value) = env_opt(key) {
        *slot = Some(value);
    }
}

/// Non-empty environment variable
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
