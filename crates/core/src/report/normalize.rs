//! Report normalisation
//!
//! LLM output is not schema-enforced, so every canonical field is looked up
//! through an ordered alias list. The first alias holding a present value
//! wins; absent fields take a field-specific default. Normalisation never
//! fails.

use brief_domain::constants::{REPORT_DEFAULT_VIBE, REPORT_NONE};
use brief_domain::{Report, ReportStatus};
use serde_json::{Map, Value};

struct TextField {
    aliases: &'static [&'static str],
    default: &'static str,
}

const TLDR: TextField = TextField { aliases: &["tldr", "TLDR", "summary"], default: "" };
const CURRENT_STATUS: TextField =
    TextField { aliases: &["currentStatus", "current_status", "CurrentStatus"], default: "" };
const DEPENDENCIES: TextField =
    TextField { aliases: &["dependencies", "Dependencies"], default: REPORT_NONE };
const SUPPORT_REQUIRED: TextField = TextField {
    aliases: &["supportRequired", "support_required", "SupportRequired"],
    default: REPORT_NONE,
};
const VIBE: TextField = TextField {
    aliases: &["vibe", "Vibe", "clientPulse", "client_pulse"],
    default: REPORT_DEFAULT_VIBE,
};

const STATUS_ALIASES: &[&str] = &["status", "Status"];
const THIS_WEEK_ALIASES: &[&str] =
    &["thisWeek", "this_week", "accomplishments", "Accomplishments", "done"];
const CHALLENGES_ALIASES: &[&str] = &["challenges", "Challenges", "blockers"];
const NEXT_WEEK_ALIASES: &[&str] = &["nextWeek", "next_week", "NextWeek", "planned"];

/// Canonical [`Report`] from arbitrary LLM JSON. Non-object input yields the
/// all-defaults report.
pub fn normalize_report(raw: &Value) -> Report {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let status = pick(object, STATUS_ALIASES)
        .map(coerce_text)
        .and_then(|text| ReportStatus::parse_loose(&text))
        .unwrap_or(ReportStatus::OnTrack);

    Report {
        tldr: pick_text(object, &TLDR),
        this_week: pick_list(object, THIS_WEEK_ALIASES),
        challenges: pick_list(object, CHALLENGES_ALIASES),
        current_status: pick_text(object, &CURRENT_STATUS),
        next_week: pick_list(object, NEXT_WEEK_ALIASES),
        dependencies: pick_text(object, &DEPENDENCIES),
        support_required: pick_text(object, &SUPPORT_REQUIRED),
        vibe: pick_text(object, &VIBE),
        status,
    }
}

fn pick<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().filter_map(|key| object.get(*key)).find(|value| is_present(value))
}

fn pick_text(object: &Map<String, Value>, field: &TextField) -> String {
    pick(object, field.aliases).map_or_else(|| field.default.to_string(), coerce_text)
}

fn pick_list(object: &Map<String, Value>, aliases: &[&str]) -> Vec<String> {
    let mut items = Vec::new();
    if let Some(value) = pick(object, aliases) {
        flatten_into(value, &mut items);
    }
    items
}

/// Falsy values (`null`, `false`, `0`, `""`) count as absent. Empty arrays
/// and objects are present.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(_) | Value::Object(_) => {
            let mut items = Vec::new();
            flatten_into(value, &mut items);
            items.join(", ")
        }
        other => scalar_text(other),
    }
}

/// Nested arrays and objects are walked depth-first; every scalar, `null`
/// included, becomes one item.
fn flatten_into(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten_into(item, out)),
        Value::Object(fields) => fields.values().for_each(|field| flatten_into(field, out)),
        other => out.push(scalar_text(other)),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let report = normalize_report(&json!({}));
        assert_eq!(report, Report::default());
        assert!(report.this_week.is_empty());
        assert_eq!(report.dependencies, "None");
        assert_eq!(report.support_required, "None");
        assert_eq!(report.vibe, "No concerns");
        assert_eq!(report.status, ReportStatus::OnTrack);
    }

    #[test]
    fn non_object_input_yields_defaults() {
        assert_eq!(normalize_report(&json!(["tldr"])), Report::default());
        assert_eq!(normalize_report(&Value::Null), Report::default());
    }

    #[test]
    fn first_present_alias_wins() {
        let report = normalize_report(&json!({
            "TLDR": "from upper",
            "summary": "from summary",
            "this_week": ["snake"],
            "accomplishments": ["ignored"],
        }));
        assert_eq!(report.tldr, "from upper");
        assert_eq!(report.this_week, vec!["snake"]);
    }

    #[test]
    fn falsy_values_fall_through_to_later_aliases() {
        let report = normalize_report(&json!({
            "tldr": "",
            "summary": "Shipped billing",
            "dependencies": null,
            "Dependencies": "Waiting on legal",
            "vibe": false,
            "clientPulse": "Client happy",
        }));
        assert_eq!(report.tldr, "Shipped billing");
        assert_eq!(report.dependencies, "Waiting on legal");
        assert_eq!(report.vibe, "Client happy");
    }

    #[test]
    fn objects_inside_lists_contribute_their_values() {
        let report = normalize_report(&json!({
            "challenges": [
                {"issue": "Scope creep", "resolution": "Change requests"},
                "Flaky CI"
            ]
        }));
        assert_eq!(report.challenges, vec!["Scope creep", "Change requests", "Flaky CI"]);
    }

    #[test]
    fn plain_object_and_primitive_are_flattened() {
        let report = normalize_report(&json!({
            "nextWeek": {"frontend": ["Polish UI"], "backend": "Ship API"},
            "done": 3,
        }));
        assert_eq!(report.next_week, vec!["Polish UI", "Ship API"]);
        assert_eq!(report.this_week, vec!["3"]);
    }

    #[test]
    fn null_list_items_are_kept_as_text() {
        let report = normalize_report(&json!({
            "thisWeek": ["a", null, {"k": ["x", "y"]}, ["p", "q"]]
        }));
        assert_eq!(report.this_week, vec!["a", "null", "x", "y", "p", "q"]);
    }

    #[test]
    fn status_accepts_codes_and_labels() {
        assert_eq!(normalize_report(&json!({"status": "AT_RISK"})).status, ReportStatus::AtRisk);
        assert_eq!(normalize_report(&json!({"Status": "Blocked"})).status, ReportStatus::Blocked);
        assert_eq!(normalize_report(&json!({"status": "green"})).status, ReportStatus::OnTrack);
    }

    #[test]
    fn non_string_scalars_are_coerced() {
        let report = normalize_report(&json!({"currentStatus": 80, "supportRequired": ["a", "b"]}));
        assert_eq!(report.current_status, "80");
        assert_eq!(report.support_required, "a, b");
    }
}
