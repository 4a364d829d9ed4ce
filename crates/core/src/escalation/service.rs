//! Shame bot orchestration

use std::sync::Arc;

use brief_domain::constants::{CELEBRATION_MESSAGE, FALLBACK_SHAME_MESSAGE};
use brief_domain::{EscalationPolicy, Result, ShameBotOutcome, TeamMember};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, instrument};

use super::level::{find_delinquents, get_escalation_level};
use super::ports::{Notifier, SubmissionSource};
use super::prompt::{build_shame_prompt, pick_theme};
use crate::llm::{CompletionGateway, LlmSettings};
use crate::time::week_of;

const ALL_SUBMITTED: &str = "All submitted!";

/// Weekly nag for team members who have not submitted
pub struct ShameBot {
    submissions: Arc<dyn SubmissionSource>,
    llm: Arc<dyn CompletionGateway>,
    notifier: Arc<dyn Notifier>,
    roster: Vec<TeamMember>,
    policy: EscalationPolicy,
    timezone: Tz,
    llm_settings: LlmSettings,
}

impl ShameBot {
    /// Bot for `roster`, escalating per `policy` in `timezone`.
    pub fn new(
        submissions: Arc<dyn SubmissionSource>,
        llm: Arc<dyn CompletionGateway>,
        notifier: Arc<dyn Notifier>,
        roster: Vec<TeamMember>,
        policy: EscalationPolicy,
        timezone: Tz,
    ) -> Self {
        Self {
            submissions,
            llm,
            notifier,
            roster,
            policy,
            timezone,
            llm_settings: LlmSettings::default(),
        }
    }

    /// Override the model settings.
    pub fn with_llm_settings(mut self, settings: LlmSettings) -> Self {
        self.llm_settings = settings;
        self
    }

    /// Diff the roster against this week's submissions and post either a
    /// celebration or an escalated reminder.
    ///
    /// Submission-query and webhook failures are returned as errors.
    #[instrument(skip(self), fields(roster = self.roster.len()))]
    pub async fn run(&self, now: DateTime<Utc>) -> Result<ShameBotOutcome> {
        let local = now.with_timezone(&self.timezone);
        let monday = week_of(local.date_naive());

        let submitted = self.submissions.submitted_emails(monday).await?;
        let delinquents = find_delinquents(&self.roster, &submitted);
        info!(week_of = %monday, submitted = submitted.len(), delinquents = delinquents.len(), "Submissions checked");

        if delinquents.is_empty() {
            self.notifier.post_message(CELEBRATION_MESSAGE).await?;
            return Ok(ShameBotOutcome {
                success: true,
                level: None,
                delinquents: Vec::new(),
                message: ALL_SUBMITTED.to_string(),
            });
        }

        let level = get_escalation_level(self.policy, &local);
        let theme = pick_theme(&mut rand::thread_rng());
        let prompt = build_shame_prompt(theme, level, &delinquents);

        let completion = self.llm.complete(self.llm_settings.request(prompt)).await?;
        let message = if completion.content.trim().is_empty() {
            FALLBACK_SHAME_MESSAGE.to_string()
        } else {
            completion.content
        };

        self.notifier.post_message(&message).await?;
        info!(level = %level, theme, "Shame message posted");

        Ok(ShameBotOutcome {
            success: true,
            level: Some(level),
            delinquents: delinquents.iter().map(|member| member.email.clone()).collect(),
            message,
        })
    }
}
