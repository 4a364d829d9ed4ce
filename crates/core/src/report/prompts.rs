//! Report generation prompts

use std::collections::HashMap;

use brief_domain::Report;

const NO_RESPONSE: &str = "No response";

const REPORT_SHAPE: &str = r#"Generate a JSON response with the following structure:
{
  "tldr": "Two sentences max: what shipped + current status/any blockers",
  "thisWeek": ["List of accomplishments, grouped by workstream if applicable"],
  "challenges": ["List of challenges WITH context and resolution for each. Empty array if none."],
  "currentStatus": "Brief summary of what's in progress and how far along",
  "nextWeek": ["List of priorities for next week"],
  "dependencies": "Any blockers or things being waited on. Use 'None' if nothing.",
  "supportRequired": "Any help needed from the team. Use 'None' if nothing.",
  "vibe": "One sentence on how the person and client/stakeholder are feeling.",
  "status": "ON_TRACK" | "AT_RISK" | "BLOCKED"
}

Guidelines:
- Keep it concise. No fluff.
- For challenges, include what happened AND how it was handled
- If no challenges are mentioned, use an empty array
- Status: "ON_TRACK" if going well, "AT_RISK" if challenges are unresolved, "BLOCKED" if work is stopped
- If dependencies or support are not mentioned, use "None"

Return ONLY valid JSON, no markdown or explanation."#;

/// First non-empty answer among `keys`.
fn answer<'a>(responses: &'a HashMap<String, String>, keys: &[&str]) -> &'a str {
    keys.iter()
        .filter_map(|key| responses.get(*key))
        .map(String::as_str)
        .find(|value| !value.trim().is_empty())
        .unwrap_or(NO_RESPONSE)
}

/// Prompt for a questionnaire-style check-in keyed by question id.
pub fn responses_prompt(responses: &HashMap<String, String>) -> String {
    format!(
        "You are an AI assistant helping create a concise weekly status update. \
Based on the following responses, generate a clean, professional report.

Responses:
- What got done this week: {done}
- Challenges and how they were handled: {challenges}
- Current status / what they're working on: {current}
- Plan for next week: {next}
- Dependencies / blockers: {dependencies}
- Support required: {support}
- Vibe check (personal and client): {vibe}

{REPORT_SHAPE}",
        done = answer(responses, &["done", "work_done", "transcript"]),
        challenges = answer(responses, &["challenges", "blockers"]),
        current = answer(responses, &["current_status"]),
        next = answer(responses, &["next_week"]),
        dependencies = answer(responses, &["dependencies"]),
        support = answer(responses, &["support"]),
        vibe = answer(responses, &["vibe", "client_pulse", "other"]),
    )
}

/// Prompt for a free-form voice transcript.
pub fn transcript_prompt(transcript: &str) -> String {
    format!(
        "You are an AI assistant helping create a concise weekly status update. \
Based on the following voice conversation transcript, generate a clean, professional report.

Transcript:
{transcript}

{REPORT_SHAPE}"
    )
}

fn joined_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.join("; ")
    }
}

/// System turn describing the report to refine.
pub fn refine_prompt(current: &Report) -> String {
    format!(
        "You are an AI assistant helping refine a weekly status update report. \
Apply the user's requested changes to the report and return the updated version. \
Keep everything else the same unless the instruction implies otherwise.

Current Report:
- TL;DR: {tldr}
- This Week: {this_week}
- Challenges: {challenges}
- Current Status: {current_status}
- Next Week: {next_week}
- Dependencies: {dependencies}
- Support Required: {support}
- Vibe: {vibe}
- Status: {status}

{REPORT_SHAPE}",
        tldr = current.tldr,
        this_week = joined_or_none(&current.this_week),
        challenges = joined_or_none(&current.challenges),
        current_status = current.current_status,
        next_week = joined_or_none(&current.next_week),
        dependencies = current.dependencies,
        support = current.support_required,
        vibe = current.vibe,
        status = current.status,
    )
}
