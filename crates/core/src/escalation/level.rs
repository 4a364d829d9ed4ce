//! Escalation level selection and delinquency diff

use std::collections::HashSet;

use brief_domain::{EscalationLevel, EscalationPolicy, TeamMember};
use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};

/// Wording tier for a run at `now`.
///
/// `now` must already be expressed in the team's timezone; the weekday and
/// hour are read from its local wall-clock.
pub fn get_escalation_level<Z: TimeZone>(policy: EscalationPolicy, now: &DateTime<Z>) -> EscalationLevel {
    let weekday = now.weekday();
    match policy {
        EscalationPolicy::TwoTier => {
            if weekday == Weekday::Mon {
                EscalationLevel::FullRoast
            } else {
                EscalationLevel::Gentle
            }
        }
        EscalationPolicy::ThreeTier { roast_from_hour } => match weekday {
            Weekday::Mon if now.hour() >= roast_from_hour => EscalationLevel::FullRoast,
            Weekday::Sun => EscalationLevel::Medium,
            _ => EscalationLevel::Gentle,
        },
    }
}

/// Roster members whose email is not among `submitted`, in roster order.
/// Comparison is case-insensitive on both sides.
pub fn find_delinquents<'a, S: AsRef<str>>(
    roster: &'a [TeamMember],
    submitted: &[S],
) -> Vec<&'a TeamMember> {
    let submitted: HashSet<String> =
        submitted.iter().map(|email| email.as_ref().trim().to_lowercase()).collect();

    roster
        .iter()
        .filter(|member| !submitted.contains(&member.email.trim().to_lowercase()))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use chrono_tz::Europe::London;

    use super::*;

    fn at(rfc3339: &str) -> DateTime<chrono_tz::Tz> {
        rfc3339.parse::<DateTime<Utc>>().unwrap().with_timezone(&London)
    }

    #[test]
    fn two_tier_roasts_all_of_monday() {
        let policy = EscalationPolicy::TwoTier;
        assert_eq!(get_escalation_level(policy, &at("2026-02-09T08:00:00Z")), EscalationLevel::FullRoast);
        assert_eq!(get_escalation_level(policy, &at("2026-02-09T00:30:00Z")), EscalationLevel::FullRoast);
    }

    #[test]
    fn two_tier_is_gentle_friday_to_sunday() {
        let policy = EscalationPolicy::TwoTier;
        assert_eq!(get_escalation_level(policy, &at("2026-02-13T18:00:00Z")), EscalationLevel::Gentle);
        assert_eq!(get_escalation_level(policy, &at("2026-02-15T18:00:00Z")), EscalationLevel::Gentle);
    }

    #[test]
    fn three_tier_waits_for_roast_hour() {
        let policy = EscalationPolicy::three_tier();
        assert_eq!(get_escalation_level(policy, &at("2026-02-09T06:59:00Z")), EscalationLevel::Gentle);
        assert_eq!(get_escalation_level(policy, &at("2026-02-09T07:00:00Z")), EscalationLevel::FullRoast);
        assert_eq!(get_escalation_level(policy, &at("2026-02-15T18:00:00Z")), EscalationLevel::Medium);
        assert_eq!(get_escalation_level(policy, &at("2026-02-13T16:00:00Z")), EscalationLevel::Gentle);
    }

    #[test]
    fn level_follows_local_weekday_not_utc() {
        // Sunday 23:30 UTC in July is already Monday 00:30 BST.
        let late_sunday = at("2026-07-12T23:30:00Z");
        assert_eq!(late_sunday.weekday(), Weekday::Mon);
        assert_eq!(
            get_escalation_level(EscalationPolicy::TwoTier, &late_sunday),
            EscalationLevel::FullRoast
        );
    }

    #[test]
    fn delinquents_are_case_insensitive() {
        let roster = vec![
            TeamMember::new("Chris@Example.com", "Chris"),
            TeamMember::new("jon@example.com", "Jon"),
            TeamMember::new("luan@example.com", "Luan"),
        ];
        let late = find_delinquents(&roster, &["chris@example.com", "LUAN@example.com"]);
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].name, "Jon");
    }

    #[test]
    fn everyone_submitted_yields_no_delinquents() {
        let roster = vec![TeamMember::new("a@example.com", "A")];
        assert!(find_delinquents(&roster, &["a@example.com".to_string()]).is_empty());
    }
}
