//! Report generation through the LLM gateway

use std::collections::HashMap;
use std::sync::Arc;

use brief_domain::{BriefError, ChatMessage, CompletionRequest, Report, Result};
use serde_json::Value;
use tracing::{debug, instrument};

use super::normalize::normalize_report;
use super::prompts::{refine_prompt, responses_prompt, transcript_prompt};
use crate::llm::{CompletionGateway, LlmSettings};

/// Turns raw check-in material into a canonical [`Report`]
pub struct ReportGenerator {
    llm: Arc<dyn CompletionGateway>,
    settings: LlmSettings,
}

impl ReportGenerator {
    /// Generator using the default model settings.
    pub fn new(llm: Arc<dyn CompletionGateway>) -> Self {
        Self { llm, settings: LlmSettings::default() }
    }

    /// Override the model settings.
    pub fn with_settings(mut self, settings: LlmSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Report from questionnaire answers keyed by question id.
    #[instrument(skip_all, fields(answers = responses.len()))]
    pub async fn generate_from_responses(
        &self,
        responses: &HashMap<String, String>,
    ) -> Result<Report> {
        self.complete(self.settings.request(responses_prompt(responses))).await
    }

    /// Report from a voice conversation transcript.
    #[instrument(skip_all, fields(transcript_len = transcript.len()))]
    pub async fn generate_from_transcript(&self, transcript: &str) -> Result<Report> {
        if transcript.trim().is_empty() {
            return Err(BriefError::InvalidInput("transcript is empty".into()));
        }
        self.complete(self.settings.request(transcript_prompt(transcript))).await
    }

    /// Apply a natural-language edit to an existing report.
    #[instrument(skip_all)]
    pub async fn refine(&self, current: &Report, instruction: &str) -> Result<Report> {
        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(BriefError::InvalidInput("instruction is empty".into()));
        }

        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![ChatMessage::system(refine_prompt(current)), ChatMessage::user(instruction)],
            fallbacks: self.settings.fallbacks.clone(),
        };
        self.complete(request).await
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Report> {
        let completion = self.llm.complete(request).await?;
        if completion.content.trim().is_empty() {
            return Err(BriefError::Internal("No response from LLM gateway".into()));
        }

        let raw = parse_json_content(&completion.content)?;
        debug!(usage = %completion.usage, "Report generated");
        Ok(normalize_report(&raw))
    }
}

/// Parse model output as JSON, tolerating a surrounding markdown fence.
pub(crate) fn parse_json_content(content: &str) -> Result<Value> {
    let body = strip_code_fence(content.trim());
    serde_json::from_str(body)
        .map_err(|err| BriefError::InvalidInput(format!("LLM returned invalid JSON: {err}")))
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_parses() {
        let value = parse_json_content(r#"{"tldr": "ok"}"#).unwrap();
        assert_eq!(value["tldr"], "ok");
    }

    #[test]
    fn fenced_json_parses() {
        let value = parse_json_content("```json\n{\"tldr\": \"ok\"}\n```").unwrap();
        assert_eq!(value["tldr"], "ok");

        let bare = parse_json_content("```\n{\"status\": \"BLOCKED\"}\n```\n").unwrap();
        assert_eq!(bare["status"], "BLOCKED");
    }

    #[test]
    fn prose_is_invalid_input() {
        let err = parse_json_content("Sure! Here is your report.").unwrap_err();
        assert!(matches!(err, BriefError::InvalidInput(_)));
    }
}
