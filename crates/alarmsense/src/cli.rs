//! Clap derive structures for the `alarmsense` CLI.
//!
//! Defines the command tree, global flags, and the filter / criteria /
//! paging argument groups shared by `search` and `export`.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use alarmsense_core::convert::parse_timestamp;
use alarmsense_core::{EXPORT_FILE_NAME, MatchMode, PAGE_SIZE_OPTIONS, PriorityFilter};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// alarmsense -- root-cause analysis for wind-turbine alarms
#[derive(Debug, Parser)]
#[command(
    name = "alarmsense",
    version,
    about = "Investigate wind-turbine alarm root causes from the command line",
    long_about = "Query the AlarmSense backend for root-cause candidates of turbine alarms,\n\
        narrow them down with client-side filters, and export them as CSV.\n\n\
        Without a configured backend (or with --offline) a built-in demo\n\
        dataset is served and flagged as OFFLINE-MOCK.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = "ALARMSENSE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Never contact a backend; serve the built-in demo data
    #[arg(long, global = true)]
    pub offline: bool,

    /// Exit with an error instead of falling back to demo data
    #[arg(long, global = true)]
    pub require_live: bool,

    /// Request timeout in seconds
    #[arg(long, env = "ALARMSENSE_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "ALARMSENSE_INSECURE", global = true)]
    pub insecure: bool,

    /// Output format (defaults to the config file, then `table`)
    #[arg(long, short = 'o', env = "ALARMSENSE_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored notices
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one identifier per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List wind-park sites
    Sites,

    /// List the turbines of a site
    #[command(alias = "wtg")]
    Turbines(TurbinesArgs),

    /// Search root causes for one turbine and time window
    #[command(alias = "rc")]
    Search(SearchArgs),

    /// Export the filtered search result as CSV
    Export(ExportArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TurbinesArgs {
    /// Site ID (see `alarmsense sites`)
    #[arg(long, short = 's')]
    pub site: String,
}

/// The four fields of a root-cause query. All are required; they are
/// optional here so validation can report every missing one at once.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Site ID
    #[arg(long, short = 's')]
    pub site: Option<String>,

    /// Turbine ID
    #[arg(long, short = 't')]
    pub turbine: Option<String>,

    /// Analysis window start (RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`, UTC)
    #[arg(long, value_parser = parse_datetime)]
    pub start: Option<DateTime<Utc>>,

    /// Analysis window end
    #[arg(long, value_parser = parse_datetime)]
    pub end: Option<DateTime<Utc>>,
}

/// Client-side narrowing applied after the backend responds.
#[derive(Debug, Args)]
pub struct CriteriaArgs {
    /// Free text over ID, alarm code, root cause, class, priority and times
    #[arg(long)]
    pub query: Option<String>,

    /// Text matching: substring, tokens or fuzzy
    #[arg(long = "match", value_name = "MODE")]
    pub match_mode: Option<MatchMode>,

    /// Priority: all, p1 or p2
    #[arg(long, default_value = "all")]
    pub priority: PriorityFilter,

    /// Keep alarms starting at or after this time
    #[arg(long, value_parser = parse_datetime)]
    pub from: Option<DateTime<Utc>>,

    /// Keep alarms starting at or before this time
    #[arg(long, value_parser = parse_datetime)]
    pub to: Option<DateTime<Utc>>,

    /// Minimum duration in minutes
    #[arg(long, value_name = "MINUTES")]
    pub min_duration: Option<u32>,

    /// Maximum duration in minutes
    #[arg(long, value_name = "MINUTES")]
    pub max_duration: Option<u32>,
}

#[derive(Debug, Args)]
pub struct PageArgs {
    /// Page to show (1-based, clamped to the last page)
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 5, 10 or 25 (defaults to the config file)
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<usize>,

    /// Show every row without paging
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub criteria: CriteriaArgs,

    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    #[command(flatten)]
    pub criteria: CriteriaArgs,

    /// Destination file, or `-` for stdout
    #[arg(long, short = 'f', default_value = EXPORT_FILE_NAME)]
    pub file: PathBuf,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a config file from the global flags (--base-url, --timeout,
    /// --insecure, --offline)
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}

// ── Value parsers ────────────────────────────────────────────────────

/// Accepts anything the backend timestamp parser does, plus a bare date
/// (midnight UTC).
fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Some(ts) = parse_timestamp(raw) {
        return Ok(ts);
    }
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("expected RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`, got {raw:?}"))
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw.parse().map_err(|_| format!("not a number: {raw:?}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("expected one of {PAGE_SIZE_OPTIONS:?}"))
    }
}
