//! `alarmsense export`: the narrowed, unpaginated result set as CSV.

use std::path::Path;

use alarmsense_core::export::{export_to_path, write_csv};

use super::Context;
use crate::cli::ExportArgs;
use crate::error::CliError;

pub async fn handle(args: ExportArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let outcome = super::search::run(&args.filter, &args.criteria, ctx).await?;
    if outcome.results.is_empty() {
        return Err(CliError::NothingToExport);
    }

    if args.file == Path::new("-") {
        let stdout = std::io::stdout().lock();
        write_csv(&outcome.results, stdout)?;
        return Ok(());
    }

    let rows = export_to_path(&outcome.results, &args.file)?;
    if !ctx.global.quiet {
        eprintln!("Exported {rows} rows to {}", args.file.display());
    }
    Ok(())
}
