//! Canonical weekly report

use std::fmt;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{REPORT_DEFAULT_VIBE, REPORT_NONE};
use crate::impl_code_conversions;

/// Delivery status of the reported work
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    #[default]
    OnTrack,
    AtRisk,
    Blocked,
}

impl_code_conversions!(ReportStatus {
    OnTrack => "ON_TRACK",
    AtRisk => "AT_RISK",
    Blocked => "BLOCKED",
});

impl ReportStatus {
    /// Human label used in Notion and the UI.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Blocked => "Blocked",
        }
    }

    /// Lenient parse accepting codes and labels in any casing, with spaces,
    /// dashes or underscores as separators.
    pub fn parse_loose(raw: &str) -> Option<Self> {
        let folded: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match folded.as_str() {
            "ontrack" => Some(Self::OnTrack),
            "atrisk" => Some(Self::AtRisk),
            "blocked" => Some(Self::Blocked),
            _ => None,
        }
    }
}

impl Serialize for ReportStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StatusVisitor;

        impl Visitor<'_> for StatusVisitor {
            type Value = ReportStatus;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("ON_TRACK, AT_RISK or BLOCKED")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                ReportStatus::parse_loose(value)
                    .ok_or_else(|| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_str(StatusVisitor)
    }
}

/// Weekly status report. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub tldr: String,
    pub this_week: Vec<String>,
    pub challenges: Vec<String>,
    pub current_status: String,
    pub next_week: Vec<String>,
    pub dependencies: String,
    pub support_required: String,
    pub vibe: String,
    pub status: ReportStatus,
}

impl Default for Report {
    fn default() -> Self {
        Self {
            tldr: String::new(),
            this_week: Vec::new(),
            challenges: Vec::new(),
            current_status: String::new(),
            next_week: Vec::new(),
            dependencies: REPORT_NONE.to_string(),
            support_required: REPORT_NONE.to_string(),
            vibe: REPORT_DEFAULT_VIBE.to_string(),
            status: ReportStatus::OnTrack,
        }
    }
}

/// Page created for a published report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedReport {
    pub success: bool,
    pub page_id: String,
    pub url: String,
}
