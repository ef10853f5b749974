//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use alarmsense_core::DataSource;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Await `fut` behind a stderr spinner. No spinner when quiet or piped.
pub async fn with_spinner<F: Future>(message: &str, global: &GlobalOpts, fut: F) -> F::Output {
    let spinner = (!global.quiet && std::io::stderr().is_terminal()).then(|| {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_owned());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    });
    let out = fut.await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    out
}

/// Enforce `--require-live`, otherwise report a fallback on stderr.
pub fn check_source(source: &DataSource, global: &GlobalOpts) -> Result<(), CliError> {
    match source {
        DataSource::Fallback { reason } if global.require_live => Err(CliError::Degraded {
            reason: reason.clone(),
        }),
        _ => {
            output::print_source_notice(source, global);
            Ok(())
        }
    }
}
