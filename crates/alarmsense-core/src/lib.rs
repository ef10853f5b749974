//! Domain layer between `alarmsense-api` and the UI consumers (CLI / TUI).
//!
//! - **[`Provider`]**: the single data-access point. Wraps an optional
//!   [`AlarmClient`](alarmsense_api::AlarmClient) and falls back to the
//!   built-in [`mock`] dataset whenever the backend is unreachable or
//!   misbehaves. Every call returns a [`Sourced<T>`] so the caller can tell
//!   live data from fallback data.
//!
//! - **[`SearchState`]**: the search form as a state machine. Field edits,
//!   validation, the `loading` / `searched` flags, and generation tagging so
//!   that only the latest search response is ever applied.
//!
//! - **[`ResultCriteria`]**: the client-side filter engine (free text,
//!   priority, time window, duration window) applied to a result set.
//!
//! - **[`Pager`]** / [`paginate`]: page slicing with clamping.
//!
//! - **[`export`]**: CSV serialization of a result set.

pub mod config;
pub mod convert;
pub mod criteria;
pub mod error;
pub mod export;
pub mod mock;
pub mod model;
pub mod pagination;
pub mod provider;
pub mod search;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ProviderConfig;
pub use criteria::{MatchMode, PriorityFilter, ResultCriteria, filter_results};
pub use error::CoreError;
pub use export::{EXPORT_FILE_NAME, EXPORT_HEADERS};
pub use model::{
    AlarmFilter, FieldError, FieldErrors, FilterField, Priority, RootCauseResult, Site, Turbine,
};
pub use pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, Pager, paginate, total_pages};
pub use provider::{DataSource, Provider, Sourced};
pub use search::{SearchState, SearchTicket, SubmitError};
