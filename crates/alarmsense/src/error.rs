//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use alarmsense_config::ConfigError;
use alarmsense_core::{CoreError, FieldErrors, FilterField};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const IO: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Search filter is incomplete or inconsistent")]
    #[diagnostic(code(alarmsense::invalid_filter), help("{details}"))]
    InvalidFilter { details: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(alarmsense::validation))]
    Validation { field: String, reason: String },

    // ── Data source ──────────────────────────────────────────────────
    #[error("Backend unavailable, refusing to serve demo data")]
    #[diagnostic(
        code(alarmsense::degraded),
        help(
            "Reason: {reason}\n\
             Check --base-url / ALARMSENSE_BASE_URL, or drop --require-live to accept fallback data."
        )
    )]
    Degraded { reason: String },

    // ── Export ───────────────────────────────────────────────────────
    #[error("Nothing to export: the filtered result set is empty")]
    #[diagnostic(
        code(alarmsense::nothing_to_export),
        help("Widen --start/--end or relax --query, --priority and the duration bounds.")
    )]
    NothingToExport,

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(alarmsense::config),
        help("Config file: {path}\nRun `alarmsense config show` to see the resolved values.")
    )]
    Config { message: String, path: String },

    #[error("Config file already exists at {path}")]
    #[diagnostic(code(alarmsense::config_exists), help("Pass --force to overwrite it."))]
    ConfigExists { path: String },

    // ── Output / IO ──────────────────────────────────────────────────
    #[error("Failed to render output: {0}")]
    #[diagnostic(code(alarmsense::render))]
    Render(String),

    #[error("I/O error: {0}")]
    #[diagnostic(code(alarmsense::io))]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    #[diagnostic(code(alarmsense::core))]
    Core { message: String },
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidFilter { .. } | Self::Validation { .. } => exit_code::USAGE,
            Self::Config { .. } | Self::ConfigExists { .. } => exit_code::CONFIG,
            Self::Io(_) => exit_code::IO,
            Self::Degraded { .. } | Self::NothingToExport | Self::Render(_) | Self::Core { .. } => {
                exit_code::GENERAL
            }
        }
    }
}

/// The flag that sets each filter field.
fn flag_for(field: FilterField) -> &'static str {
    match field {
        FilterField::SiteId => "--site",
        FilterField::TurbineId => "--turbine",
        FilterField::StartDateTime => "--start",
        FilterField::EndDateTime => "--end",
    }
}

impl From<FieldErrors> for CliError {
    fn from(errors: FieldErrors) -> Self {
        let details = errors
            .iter()
            .map(|(field, err)| match err {
                alarmsense_core::FieldError::InvalidRange => {
                    format!("{}: {err} (must not be before --start)", flag_for(field))
                }
                alarmsense_core::FieldError::Required => format!("{}: {err}", flag_for(field)),
            })
            .collect::<Vec<_>>()
            .join("\n");
        Self::InvalidFilter { details }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidPageSize { size } => CliError::Validation {
                field: "page-size".into(),
                reason: format!("{size} is not one of 5, 10, 25"),
            },
            CoreError::NothingToExport => CliError::NothingToExport,
            CoreError::Io(e) => CliError::Io(e),
            CoreError::Csv(e) => CliError::Io(e.into()),
            CoreError::InvalidUrl { url, reason } => CliError::Config {
                message: format!("invalid backend URL {url:?}: {reason}"),
                path: alarmsense_config::config_path().display().to_string(),
            },
            other => CliError::Core {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
                path: alarmsense_config::config_path().display().to_string(),
            },
        }
    }
}
