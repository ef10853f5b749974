//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod export;
pub mod search;
pub mod sites;
pub mod turbines;
pub mod util;

use alarmsense_core::{MatchMode, Provider};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Everything a data command needs, resolved once in `main`.
pub struct Context<'a> {
    pub provider: Provider,
    pub format: OutputFormat,
    pub default_page_size: usize,
    pub default_match: MatchMode,
    pub global: &'a GlobalOpts,
}

pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Sites => sites::handle(ctx).await,
        Command::Turbines(args) => turbines::handle(args, ctx).await,
        Command::Search(args) => search::handle(args, ctx).await,
        Command::Export(args) => export::handle(args, ctx).await,
        // Handled in `main` before a provider is built
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
