//! Shame bot orchestration against in-memory collaborators

mod support;

use std::sync::Arc;

use brief_core::escalation::REFERENCE_THEMES;
use brief_core::ShameBot;
use brief_domain::constants::{CELEBRATION_MESSAGE, FALLBACK_SHAME_MESSAGE};
use brief_domain::{BriefError, EscalationLevel, EscalationPolicy, TeamMember};
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Europe::London;
use support::{FakeSubmissions, RecordingNotifier, ScriptedLlm};

fn roster() -> Vec<TeamMember> {
    vec![
        TeamMember::new("chris@example.com", "Chris"),
        TeamMember::new("jon@example.com", "Jon"),
        TeamMember::new("talha@example.com", "Talha"),
    ]
}

fn bot(
    submissions: Arc<FakeSubmissions>,
    llm: Arc<ScriptedLlm>,
    notifier: Arc<RecordingNotifier>,
) -> ShameBot {
    ShameBot::new(submissions, llm, notifier, roster(), EscalationPolicy::TwoTier, London)
}

#[tokio::test]
async fn everyone_submitted_posts_celebration() {
    let submissions =
        Arc::new(FakeSubmissions::new(&["chris@example.com", "JON@example.com", "talha@example.com"]));
    let llm = Arc::new(ScriptedLlm::answering("unused"));
    let notifier = Arc::new(RecordingNotifier::default());

    let monday = Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap();
    let outcome = bot(submissions, Arc::clone(&llm), Arc::clone(&notifier)).run(monday).await.unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.level, None);
    assert!(outcome.delinquents.is_empty());
    assert_eq!(notifier.posted.lock().unwrap().as_slice(), [CELEBRATION_MESSAGE]);
    assert!(llm.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn delinquents_get_an_escalated_message() {
    let submissions = Arc::new(FakeSubmissions::new(&["chris@example.com"]));
    let llm = Arc::new(ScriptedLlm::answering("*I find your lack of updates disturbing*"));
    let notifier = Arc::new(RecordingNotifier::default());

    let monday = Utc.with_ymd_and_hms(2026, 2, 9, 8, 0, 0).unwrap();
    let outcome = bot(Arc::clone(&submissions), Arc::clone(&llm), Arc::clone(&notifier))
        .run(monday)
        .await
        .unwrap();

    assert_eq!(outcome.level, Some(EscalationLevel::FullRoast));
    assert_eq!(outcome.delinquents, vec!["jon@example.com", "talha@example.com"]);
    assert_eq!(outcome.message, "*I find your lack of updates disturbing*");
    assert_eq!(notifier.posted.lock().unwrap().len(), 1);

    let asked = submissions.asked.lock().unwrap();
    assert_eq!(asked.as_slice(), [NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()]);

    let requests = llm.requests.lock().unwrap();
    let prompt = &requests[0].messages[0].content;
    assert_eq!(requests[0].model, "gpt-4o-mini");
    assert_eq!(requests[0].fallbacks, vec!["claude-3-5-haiku-latest"]);
    assert!(prompt.contains("CURRENT ESCALATION LEVEL: FULL_ROAST"));
    assert!(prompt.contains("• Jon (jon@example.com)"));
    assert!(!prompt.contains("Chris (chris@example.com)"));
    assert!(REFERENCE_THEMES.iter().any(|theme| prompt.contains(&format!("\"{theme}\""))));
}

#[tokio::test]
async fn empty_completion_uses_fallback_message() {
    let submissions = Arc::new(FakeSubmissions::new(&[]));
    let llm = Arc::new(ScriptedLlm::answering(""));
    let notifier = Arc::new(RecordingNotifier::default());

    let friday = Utc.with_ymd_and_hms(2026, 2, 13, 16, 0, 0).unwrap();
    let outcome = bot(submissions, llm, Arc::clone(&notifier)).run(friday).await.unwrap();

    assert_eq!(outcome.level, Some(EscalationLevel::Gentle));
    assert_eq!(outcome.message, FALLBACK_SHAME_MESSAGE);
    assert_eq!(notifier.posted.lock().unwrap().as_slice(), [FALLBACK_SHAME_MESSAGE]);
}

#[tokio::test]
async fn submission_query_failure_propagates() {
    let notifier = Arc::new(RecordingNotifier::default());
    let result = bot(
        Arc::new(FakeSubmissions::failing()),
        Arc::new(ScriptedLlm::answering("x")),
        Arc::clone(&notifier),
    )
    .run(Utc.with_ymd_and_hms(2026, 2, 15, 18, 0, 0).unwrap())
    .await;

    assert!(matches!(result, Err(BriefError::Upstream { status: 502, .. })));
    assert!(notifier.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn week_is_resolved_in_team_timezone() {
    // Sunday 23:30 UTC in July is Monday 00:30 BST, a new week.
    let submissions = Arc::new(FakeSubmissions::new(&[]));
    let now = Utc.with_ymd_and_hms(2026, 7, 12, 23, 30, 0).unwrap();
    let outcome = bot(
        Arc::clone(&submissions),
        Arc::new(ScriptedLlm::answering("roast")),
        Arc::new(RecordingNotifier::default()),
    )
    .run(now)
    .await
    .unwrap();

    assert_eq!(outcome.level, Some(EscalationLevel::FullRoast));
    assert_eq!(
        submissions.asked.lock().unwrap().as_slice(),
        [NaiveDate::from_ymd_opt(2026, 7, 13).unwrap()]
    );
}
