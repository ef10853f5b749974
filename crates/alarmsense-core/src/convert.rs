// ── Wire → domain conversion ──
//
// Bridges `alarmsense_api` wire types into the canonical domain model.
// Missing identifiers become `UNKNOWN-<n>` synthetic ids; priorities
// outside P1/P2 are rejected.

use std::str::FromStr;

use alarmsense_api::{RootCauseQuery, WireRootCause, WireSite, WireTurbine};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::error::CoreError;
use crate::model::{AlarmFilter, Priority, RootCauseResult, Site, Turbine};

/// Naive layouts accepted after RFC 3339, all read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// ── Helpers ─────────────────────────────────────────────────────────

/// Parse a backend timestamp. RFC 3339 first, then the naive layouts.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// RFC 3339 with second precision and a `Z` suffix.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn synthetic_id(index: usize) -> String {
    format!("UNKNOWN-{index}")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ── Site / turbine ──────────────────────────────────────────────────

/// Convert a wire site; `index` seeds the synthetic id when `id` is absent.
pub fn site_from_wire(wire: WireSite, index: usize) -> Site {
    let id = non_empty(wire.id).unwrap_or_else(|| synthetic_id(index));
    let name = non_empty(wire.name).unwrap_or_else(|| id.clone());
    Site { id, name }
}

/// Convert a wire turbine fetched for `requested_site`.
///
/// Backends that omit `siteId` get the site the list was requested for.
pub fn turbine_from_wire(wire: WireTurbine, index: usize, requested_site: &str) -> Turbine {
    let id = non_empty(wire.id).unwrap_or_else(|| synthetic_id(index));
    let name = non_empty(wire.name).unwrap_or_else(|| id.clone());
    let site_id = non_empty(wire.site_id).unwrap_or_else(|| requested_site.to_owned());
    Turbine { id, site_id, name }
}

// ── Root cause ──────────────────────────────────────────────────────

/// Convert a wire root-cause record.
///
/// Fails only on the priority: anything other than P1/P2 (including a
/// missing value) is a schema violation.
pub fn root_cause_from_wire(wire: WireRootCause, index: usize) -> Result<RootCauseResult, CoreError> {
    let id = non_empty(wire.id).unwrap_or_else(|| synthetic_id(index));
    let raw_priority = wire.priority.unwrap_or_default();
    let priority = Priority::from_str(raw_priority.trim()).map_err(|_| {
        CoreError::UnsupportedPriority {
            id: id.clone(),
            value: raw_priority.clone(),
        }
    })?;

    Ok(RootCauseResult {
        start_time: wire.start_time.as_deref().and_then(parse_timestamp),
        end_time: wire.end_time.as_deref().and_then(parse_timestamp),
        root_cause_name: wire.root_cause_name.unwrap_or_default(),
        alarm_code: wire.alarm_code.unwrap_or_default(),
        class: wire.class_name.unwrap_or_default(),
        priority,
        id,
    })
}

/// Convert a full response; the first bad record rejects the whole set.
pub fn root_causes_from_wire(wire: Vec<WireRootCause>) -> Result<Vec<RootCauseResult>, CoreError> {
    wire.into_iter()
        .enumerate()
        .map(|(i, w)| root_cause_from_wire(w, i))
        .collect()
}

// ── Query ───────────────────────────────────────────────────────────

impl From<&AlarmFilter> for RootCauseQuery {
    fn from(filter: &AlarmFilter) -> Self {
        Self {
            site_id: filter.site_id.clone(),
            turbine_id: filter.turbine_id.clone(),
            start_date_time: filter.start_date_time.map(format_timestamp).unwrap_or_default(),
            end_date_time: filter.end_date_time.map(format_timestamp).unwrap_or_default(),
        }
    }
}
