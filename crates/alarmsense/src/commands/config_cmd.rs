//! `alarmsense config show|path|init`

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, DEFAULT_BASE_URL};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::resolve(global)?;
            let rendered = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Init { force } => {
            let path = config::config_path();
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }

            let cfg = initial_config(global);
            // Reject a bad URL before anything is written
            cfg.provider_config()?;
            let written = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Wrote {}", written.display());
            }
            Ok(())
        }
    }
}

/// Defaults plus the backend flags. Without `--offline` the file points at
/// the default backend unless `--base-url` says otherwise.
fn initial_config(global: &GlobalOpts) -> Config {
    let mut cfg = Config::default();
    cfg.backend.base_url = Some(DEFAULT_BASE_URL.to_owned());
    config::apply_overrides(&mut cfg, global);
    cfg
}
