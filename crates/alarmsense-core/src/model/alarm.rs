// ── Root-cause result domain type ──

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Severity classification of a root-cause candidate.
///
/// The only accepted domain. Records using the retired High/Medium/Low
/// scheme are rejected during conversion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    /// Critical.
    P1,
    /// Moderate.
    P2,
}

impl Priority {
    /// Human-readable severity.
    pub fn severity(self) -> &'static str {
        match self {
            Self::P1 => "Critical",
            Self::P2 => "Moderate",
        }
    }
}

/// A diagnosed root-cause candidate returned by a search.
///
/// Timestamps are `None` when the backend sent something unparseable; such
/// records still display but fail any time or duration bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseResult {
    pub id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub root_cause_name: String,
    pub alarm_code: String,
    pub class: String,
    pub priority: Priority,
}

impl RootCauseResult {
    /// `end_time - start_time`, when both are known.
    pub fn duration(&self) -> Option<TimeDelta> {
        Some(self.end_time? - self.start_time?)
    }

    /// Whole minutes, truncated.
    pub fn duration_minutes(&self) -> Option<i64> {
        self.duration().map(|d| d.num_minutes())
    }

    /// Minutes rounded to the nearest whole minute.
    pub fn rounded_duration_minutes(&self) -> Option<i64> {
        self.duration()
            .map(|d| (d.num_seconds() + 30).div_euclid(60))
    }

    pub fn start_date(&self) -> String {
        format_opt(self.start_time, DATE_FORMAT)
    }

    pub fn start_clock(&self) -> String {
        format_opt(self.start_time, TIME_FORMAT)
    }

    pub fn end_date(&self) -> String {
        format_opt(self.end_time, DATE_FORMAT)
    }

    pub fn end_clock(&self) -> String {
        format_opt(self.end_time, TIME_FORMAT)
    }

    /// `YYYY-MM-DD HH:MM`, or empty when unknown.
    pub fn start_label(&self) -> String {
        format_opt(self.start_time, TIMESTAMP_FORMAT)
    }

    /// `YYYY-MM-DD HH:MM`, or empty when unknown.
    pub fn end_label(&self) -> String {
        format_opt(self.end_time, TIMESTAMP_FORMAT)
    }

    /// Lower-cased text the free-text search runs against.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {} {}",
            self.id,
            self.alarm_code,
            self.root_cause_name,
            self.class,
            self.priority,
            self.start_date(),
            self.start_clock(),
            self.end_date(),
            self.end_clock(),
        )
        .to_lowercase()
    }
}

fn format_opt(ts: Option<DateTime<Utc>>, fmt: &str) -> String {
    ts.map(|t| t.format(fmt).to_string()).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn sample() -> RootCauseResult {
        RootCauseResult {
            id: "ALM-100".into(),
            start_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()),
            end_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 9, 15, 40).unwrap()),
            root_cause_name: "Gearbox Overheat".into(),
            alarm_code: "ERR-0042".into(),
            class: "Mechanical".into(),
            priority: Priority::P1,
        }
    }

    #[test]
    fn duration_is_derived() {
        let r = sample();
        assert_eq!(r.duration_minutes(), Some(45));
        assert_eq!(r.rounded_duration_minutes(), Some(46));
    }

    #[test]
    fn missing_timestamp_has_no_duration() {
        let r = RootCauseResult {
            end_time: None,
            ..sample()
        };
        assert_eq!(r.duration(), None);
        assert_eq!(r.end_label(), "");
    }

    #[test]
    fn searchable_text_includes_formatted_times() {
        let text = sample().searchable_text();
        assert!(text.contains("alm-100"));
        assert!(text.contains("gearbox overheat"));
        assert!(text.contains("2024-05-01"));
        assert!(text.contains("08:30"));
        assert!(text.contains("p1"));
    }

    #[test]
    fn priority_parses_canonical_values_only() {
        assert_eq!(Priority::from_str("P1").unwrap(), Priority::P1);
        assert_eq!(Priority::from_str("p2").unwrap(), Priority::P2);
        assert!(Priority::from_str("High").is_err());
        assert!(Priority::from_str("Low").is_err());
    }
}
