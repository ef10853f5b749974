// ── Result filter engine ──
//
// Narrows an applied result set by free text, priority, start-time window
// and duration window. All criteria are optional and combined with AND.
// Filtering keeps the input order and is idempotent.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::{Priority, RootCauseResult};

/// How free text is matched against a record.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum MatchMode {
    /// The whole query must appear as one substring.
    Substring,
    /// Every whitespace-separated token must appear.
    Tokens,
    /// Like `Tokens`, but a token may also match as an in-order
    /// subsequence ("gbx" finds "gearbox").
    #[default]
    Fuzzy,
}

/// `ALL` or one priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn accepts(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(p) => p == priority,
        }
    }

    /// Cycle ALL → P1 → P2 → ALL.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Only(Priority::P1),
            Self::Only(Priority::P1) => Self::Only(Priority::P2),
            Self::Only(Priority::P2) => Self::All,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Priority::from_str(s.trim()).map(Self::Only)
        }
    }
}

/// Client-side filter criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultCriteria {
    pub text: String,
    pub mode: MatchMode,
    pub priority: PriorityFilter,
    /// Inclusive lower bound on `start_time`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `start_time`.
    pub to: Option<DateTime<Utc>>,
    /// Inclusive minimum duration in minutes.
    pub min_duration: Option<u32>,
    /// Inclusive maximum duration in minutes.
    pub max_duration: Option<u32>,
}

impl ResultCriteria {
    /// Whether any criterion would exclude something.
    pub fn is_active(&self) -> bool {
        !self.text.trim().is_empty()
            || self.priority != PriorityFilter::All
            || self.from.is_some()
            || self.to.is_some()
            || self.min_duration.is_some()
            || self.max_duration.is_some()
    }

    /// Reset every criterion; the match mode is a preference and stays.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            ..Self::default()
        };
    }

    pub fn matches(&self, record: &RootCauseResult) -> bool {
        self.priority.accepts(record.priority)
            && self.matches_window(record)
            && self.matches_duration(record)
            && self.matches_text(record)
    }

    fn matches_window(&self, record: &RootCauseResult) -> bool {
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(start) = record.start_time else {
            return false;
        };
        self.from.is_none_or(|from| start >= from) && self.to.is_none_or(|to| start <= to)
    }

    fn matches_duration(&self, record: &RootCauseResult) -> bool {
        if self.min_duration.is_none() && self.max_duration.is_none() {
            return true;
        }
        let Some(seconds) = record.duration().map(|d| d.num_seconds()) else {
            return false;
        };
        self.min_duration
            .is_none_or(|min| seconds >= i64::from(min) * 60)
            && self
                .max_duration
                .is_none_or(|max| seconds <= i64::from(max) * 60)
    }

    fn matches_text(&self, record: &RootCauseResult) -> bool {
        let query = self.text.trim();
        if query.is_empty() {
            return true;
        }
        if same_alarm_code(query, &record.alarm_code) {
            return true;
        }

        let haystack = record.searchable_text();
        let query = query.to_lowercase();
        match self.mode {
            MatchMode::Substring => haystack.contains(&query),
            MatchMode::Tokens => query.split_whitespace().all(|t| haystack.contains(t)),
            MatchMode::Fuzzy => query
                .split_whitespace()
                .all(|t| haystack.contains(t) || is_subsequence(t, &haystack)),
        }
    }
}

/// Apply `criteria` to `results`, preserving order.
pub fn filter_results(results: &[RootCauseResult], criteria: &ResultCriteria) -> Vec<RootCauseResult> {
    results
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect()
}

/// Case-insensitive comparison ignoring all whitespace.
fn same_alarm_code(query: &str, code: &str) -> bool {
    let normalize = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    };
    let code = normalize(code);
    !code.is_empty() && normalize(query) == code
}

/// `needle` appears in `haystack` in order, not necessarily contiguous.
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars();
    needle.chars().all(|n| hay.any(|h| h == n))
}
