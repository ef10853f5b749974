//! `alarmsense-tui`: terminal dashboard for wind-turbine alarm root-cause
//! analysis.
//!
//! Pick a site, a turbine and an analysis window, run the search, then
//! narrow, page, inspect and export the results. When the backend is
//! missing or failing the dashboard keeps working on demo data and says so
//! in the status bar.
//!
//! Logs go to a file (default `<data dir>/alarmsense-tui.log`) so they never
//! corrupt the terminal.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use alarmsense_config::Config;
use alarmsense_core::Provider;

use crate::app::App;

const LOG_FILE_NAME: &str = "alarmsense-tui.log";

/// Terminal dashboard for alarm root-cause analysis.
#[derive(Parser, Debug)]
#[command(name = "alarmsense-tui", version, about)]
struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(short = 'u', long, env = "ALARMSENSE_BASE_URL")]
    base_url: Option<String>,

    /// Skip the backend and browse demo data (wins over --base-url)
    #[arg(long)]
    offline: bool,

    /// Log file path (defaults to the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. Hold the guard until exit so buffered lines flush.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "alarmsense_tui={level},alarmsense_core={level},alarmsense_api={level}"
        ))
    });

    let path = cli
        .log_file
        .clone()
        .unwrap_or_else(|| alarmsense_config::data_dir().join(LOG_FILE_NAME));
    let dir = path
        .parent()
        .map_or_else(|| PathBuf::from("."), std::path::Path::to_path_buf);
    std::fs::create_dir_all(&dir)?;
    let file_name = path
        .file_name()
        .map_or_else(|| LOG_FILE_NAME.into(), std::ffi::OsStr::to_os_string);

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    Ok(guard)
}

/// Config file and environment, then flags. A broken file is logged and
/// replaced by defaults so the dashboard still opens.
fn resolve_config(cli: &Cli) -> Config {
    let mut config = alarmsense_config::load_config().unwrap_or_else(|e| {
        warn!(error = %e, "config unusable, using defaults");
        Config::default()
    });
    if let Some(url) = &cli.base_url {
        config.backend.base_url = Some(url.clone());
    }
    if cli.offline {
        config.backend.base_url = None;
    }
    config
}

fn build_provider(config: &Config) -> Provider {
    let provider = config
        .provider_config()
        .map_err(|e| e.to_string())
        .and_then(|pc| Provider::from_config(&pc).map_err(|e| e.to_string()));
    provider.unwrap_or_else(|reason| {
        warn!(%reason, "backend settings rejected, running on demo data");
        Provider::offline()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _guard = setup_tracing(&cli)?;

    let config = resolve_config(&cli);
    let provider = build_provider(&config);
    info!(
        base_url = ?config.backend.base_url,
        offline = provider.is_offline(),
        "starting alarmsense-tui"
    );

    App::new(provider, &config).run().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["alarmsense-tui"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn offline_wins_over_base_url() {
        let cli = parse(&["--offline", "--base-url", "http://localhost:1/api"]);
        assert!(resolve_config(&cli).backend.base_url.is_none());
    }

    #[test]
    fn bad_url_falls_back_to_demo_data() {
        let mut config = Config::default();
        config.backend.base_url = Some("not a url".into());
        assert!(build_provider(&config).is_offline());
    }

    #[test]
    fn verbosity_counts() {
        assert_eq!(parse(&["-vv"]).verbose, 2);
        assert!(parse(&["--offline"]).offline);
    }
}
