// ── Built-in demo dataset ──
//
// Served whenever the backend is unreachable or not configured. The data
// is deterministic so that demos and tests see the same rows every time.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::model::{AlarmFilter, Priority, RootCauseResult, Site, Turbine};

const SITES: &[(&str, &str)] = &[
    ("S1", "North Sea Wind Park"),
    ("S2", "Texas Ridge Energy"),
    ("S3", "Bavarian Highlands"),
];

const TURBINES: &[(&str, &str, &str)] = &[
    ("T1-1", "S1", "NS-WTG-001"),
    ("T1-2", "S1", "NS-WTG-002"),
    ("T1-3", "S1", "NS-WTG-003"),
    ("T2-1", "S2", "TX-WTG-A1"),
    ("T2-2", "S2", "TX-WTG-A2"),
    ("T3-1", "S3", "BV-WTG-X01"),
];

const RESULT_COUNT: u32 = 45;
const DURATIONS_MIN: [i64; 5] = [45, 20, 90, 35, 60];

pub fn sites() -> Vec<Site> {
    SITES
        .iter()
        .map(|(id, name)| Site {
            id: (*id).to_owned(),
            name: (*name).to_owned(),
        })
        .collect()
}

pub fn turbines_for(site_id: &str) -> Vec<Turbine> {
    TURBINES
        .iter()
        .filter(|(_, site, _)| *site == site_id)
        .map(|(id, site, name)| Turbine {
            id: (*id).to_owned(),
            site_id: (*site).to_owned(),
            name: (*name).to_owned(),
        })
        .collect()
}

/// The full demo result set: `ALM-100` through `ALM-144`.
pub fn root_causes() -> Vec<RootCauseResult> {
    (0..RESULT_COUNT).map(root_cause).collect()
}

/// Demo results narrowed to the filter's analysis window.
///
/// Falls back to the full set when the window matches nothing, so an
/// offline demo never looks empty.
pub fn root_causes_for(filter: &AlarmFilter) -> Vec<RootCauseResult> {
    let all = root_causes();
    let (Some(from), Some(to)) = (filter.start_date_time, filter.end_date_time) else {
        return all;
    };
    let windowed: Vec<RootCauseResult> = all
        .iter()
        .filter(|r| r.start_time.is_some_and(|t| t >= from && t <= to))
        .cloned()
        .collect();
    if windowed.is_empty() { all } else { windowed }
}

fn root_cause(i: u32) -> RootCauseResult {
    let start = may_2024(i % 28 + 1);
    let minutes = DURATIONS_MIN
        .get(usize::try_from(i).unwrap_or_default() % DURATIONS_MIN.len())
        .copied()
        .unwrap_or(45);
    let end = start.map(|s| s + TimeDelta::minutes(minutes));

    let root_cause_name = if i % 3 == 0 {
        "Gearbox Overheat"
    } else if i % 2 == 0 {
        "Grid Instability"
    } else {
        "Yaw Controller Failure"
    };

    RootCauseResult {
        id: format!("ALM-{}", i + 100),
        start_time: start,
        end_time: end,
        root_cause_name: root_cause_name.to_owned(),
        alarm_code: format!("ERR-00{}", (i * 37) % 90 + 10),
        class: if i % 2 == 0 { "Mechanical" } else { "Electrical" }.to_owned(),
        priority: if i % 5 == 0 || i % 3 == 0 {
            Priority::P1
        } else {
            Priority::P2
        },
    }
}

fn may_2024(day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .and_then(|d| d.and_hms_opt(8, 30, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn turbines_belong_to_their_site() {
        let s1 = turbines_for("S1");
        assert_eq!(s1.len(), 3);
        assert!(s1.iter().all(|t| t.site_id == "S1"));
        assert!(turbines_for("S404").is_empty());
    }

    #[test]
    fn results_have_unique_ids_and_sane_durations() {
        let results = root_causes();
        assert_eq!(results.len(), 45);
        let ids: HashSet<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 45);
        assert_eq!(results[0].id, "ALM-100");
        assert_eq!(results[44].id, "ALM-144");
        assert!(results.iter().all(|r| r.duration_minutes().unwrap() > 0));
    }

    #[test]
    fn window_narrows_results() {
        let filter = AlarmFilter {
            site_id: "S1".into(),
            turbine_id: "T1-1".into(),
            start_date_time: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            end_date_time: Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()),
        };
        let results = root_causes_for(&filter);
        assert!(!results.is_empty());
        assert!(results.len() < 45);
    }

    #[test]
    fn empty_window_returns_everything() {
        let filter = AlarmFilter {
            start_date_time: Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()),
            end_date_time: Some(Utc.with_ymd_and_hms(2030, 1, 2, 0, 0, 0).unwrap()),
            ..AlarmFilter::default()
        };
        assert_eq!(root_causes_for(&filter).len(), 45);
    }
}
