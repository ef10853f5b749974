// AlarmSense wire types
//
// Backends in the field disagree on casing: some emit camelCase
// (`siteId`), others PascalCase (`SiteId`). Every field accepts both.
// All fields are optional here; `alarmsense-core` decides what a missing
// value means for the domain model.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// A list response. Accepts a bare JSON array or `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Bare(Vec<T>),
    Wrapped {
        #[serde(alias = "Data")]
        data: Vec<T>,
    },
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Bare(items) | Self::Wrapped { data: items } => items,
        }
    }
}

// ── Site ─────────────────────────────────────────────────────────────

/// Site object from `GET /sites`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSite {
    #[serde(default, alias = "Id")]
    pub id: Option<String>,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

// ── Turbine ──────────────────────────────────────────────────────────

/// Turbine object from `GET /turbines?siteId=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTurbine {
    #[serde(default, alias = "Id")]
    pub id: Option<String>,
    #[serde(default, alias = "SiteId")]
    pub site_id: Option<String>,
    #[serde(default, alias = "Name")]
    pub name: Option<String>,
}

// ── Root cause ───────────────────────────────────────────────────────

/// Root-cause candidate from `POST /rootcause`.
///
/// Timestamps stay as strings; backends send RFC 3339 as well as
/// `YYYY-MM-DD HH:MM` and parsing belongs to the domain layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRootCause {
    #[serde(default, alias = "Id")]
    pub id: Option<String>,
    #[serde(default, alias = "StartTime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "EndTime")]
    pub end_time: Option<String>,
    #[serde(default, alias = "RootCauseName")]
    pub root_cause_name: Option<String>,
    #[serde(default, alias = "AlarmCode")]
    pub alarm_code: Option<String>,
    #[serde(default, rename = "class", alias = "Class")]
    pub class_name: Option<String>,
    #[serde(default, alias = "Priority")]
    pub priority: Option<String>,
}

// ── Query ────────────────────────────────────────────────────────────

/// JSON body for `POST /rootcause`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseQuery {
    pub site_id: String,
    pub turbine_id: String,
    pub start_date_time: String,
    pub end_date_time: String,
}
