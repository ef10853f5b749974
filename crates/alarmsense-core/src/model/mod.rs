// ── Domain model ──
//
// Canonical types consumed by the CLI and TUI. Wire types from
// `alarmsense-api` are converted into these in `crate::convert`.

pub mod alarm;
pub mod filter;
pub mod site;

pub use alarm::{Priority, RootCauseResult};
pub use filter::{AlarmFilter, FieldError, FieldErrors, FilterField};
pub use site::{Site, Turbine};
