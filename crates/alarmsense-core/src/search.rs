// ── Search form state machine ──
//
// Owns the filter being edited, its field errors, the turbine list for the
// selected site, and the last applied result set. Each accepted submit
// gets a new generation; responses carrying an older generation are
// dropped so the latest search always wins.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{AlarmFilter, FieldErrors, FilterField, RootCauseResult, Turbine};
use crate::provider::{DataSource, Sourced};

/// Handle for one accepted submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub filter: AlarmFilter,
}

/// Why a submit was not issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("a search is already in flight")]
    Busy,
    #[error("{0}")]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    filter: AlarmFilter,
    errors: FieldErrors,
    turbines: Vec<Turbine>,
    results: Vec<RootCauseResult>,
    source: Option<DataSource>,
    searched: bool,
    loading: bool,
    generation: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn filter(&self) -> &AlarmFilter {
        &self.filter
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn turbines(&self) -> &[Turbine] {
        &self.turbines
    }

    pub fn results(&self) -> &[RootCauseResult] {
        &self.results
    }

    /// Source of the applied result set; `None` before the first response.
    pub fn source(&self) -> Option<&DataSource> {
        self.source.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_searched(&self) -> bool {
        self.searched
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ── Field edits ─────────────────────────────────────────────────

    /// Select a site. Clears the turbine selection and the turbine list
    /// immediately, whatever fetch may be outstanding for the old site.
    pub fn set_site(&mut self, site_id: impl Into<String>) {
        let site_id = site_id.into();
        if site_id != self.filter.site_id {
            self.filter.turbine_id.clear();
            self.turbines.clear();
        }
        self.filter.site_id = site_id;
        self.errors.remove(FilterField::SiteId);
    }

    pub fn set_turbine(&mut self, turbine_id: impl Into<String>) {
        self.filter.turbine_id = turbine_id.into();
        self.errors.remove(FilterField::TurbineId);
    }

    pub fn set_start(&mut self, start: Option<DateTime<Utc>>) {
        self.filter.start_date_time = start;
        self.errors.remove(FilterField::StartDateTime);
    }

    pub fn set_end(&mut self, end: Option<DateTime<Utc>>) {
        self.filter.end_date_time = end;
        self.errors.remove(FilterField::EndDateTime);
    }

    /// Apply a turbine list. Ignored (returns `false`) if the user has
    /// moved to another site since the fetch was issued.
    pub fn turbines_loaded(&mut self, site_id: &str, turbines: Vec<Turbine>) -> bool {
        if site_id.is_empty() || site_id != self.filter.site_id {
            return false;
        }
        self.turbines = turbines;
        true
    }

    // ── Submit / response ───────────────────────────────────────────

    /// Validate and, on success, start a search.
    pub fn submit(&mut self) -> Result<SearchTicket, SubmitError> {
        if self.loading {
            return Err(SubmitError::Busy);
        }
        if let Err(errors) = self.filter.validate() {
            self.errors = errors.clone();
            return Err(SubmitError::Invalid(errors));
        }
        self.errors.clear();
        self.searched = true;
        self.loading = true;
        self.generation += 1;
        Ok(SearchTicket {
            generation: self.generation,
            filter: self.filter.clone(),
        })
    }

    /// Apply a search response. Returns `false` and leaves state untouched
    /// when `generation` is not the latest.
    pub fn complete(&mut self, generation: u64, response: Sourced<Vec<RootCauseResult>>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.results = response.data;
        self.source = Some(response.source);
        self.loading = false;
        true
    }

    /// Back to the initial form. Any in-flight response becomes stale.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }
}
