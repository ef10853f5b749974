//! CLI configuration: thin wrapper around `alarmsense_config`.
//!
//! Loads the shared file + environment layers and applies the
//! `GlobalOpts` flag overrides (--base-url, --offline, --timeout, ...).

use clap::ValueEnum;
use tracing::warn;

use alarmsense_core::ProviderConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use alarmsense_config::{Config, DEFAULT_BASE_URL, config_path, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Load the config file and environment, then apply flag overrides.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut config = alarmsense_config::load_config()?;
    apply_overrides(&mut config, global);
    config.validate()?;
    Ok(config)
}

/// Flags win over file and environment. `--offline` wins over everything.
pub fn apply_overrides(config: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.base_url {
        config.backend.base_url = Some(url.clone());
    }
    if global.offline {
        config.backend.base_url = None;
    }
    if let Some(timeout) = global.timeout {
        config.backend.timeout = timeout;
    }
    if global.insecure {
        config.backend.insecure = true;
    }
}

/// Runtime provider settings for the resolved config.
pub fn provider_config(config: &Config) -> Result<ProviderConfig, CliError> {
    Ok(config.provider_config()?)
}

/// `--output` if given, else the configured default, else `table`.
pub fn output_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if let Some(format) = global.output {
        return format;
    }
    OutputFormat::from_str(&config.defaults.output, true).unwrap_or_else(|_| {
        warn!(value = %config.defaults.output, "unknown defaults.output, using table");
        OutputFormat::Table
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["alarmsense"];
        argv.extend_from_slice(args);
        argv.push("sites");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_config() {
        let mut config = Config::default();
        config.backend.base_url = Some("http://file:1/api".into());
        apply_overrides(
            &mut config,
            &global(&["--base-url", "http://flag:2/api", "--timeout", "5", "-k"]),
        );
        assert_eq!(config.backend.base_url.as_deref(), Some("http://flag:2/api"));
        assert_eq!(config.backend.timeout, 5);
        assert!(config.backend.insecure);
    }

    #[test]
    fn offline_clears_backend() {
        let mut config = Config::default();
        config.backend.base_url = Some(DEFAULT_BASE_URL.into());
        apply_overrides(&mut config, &global(&["--offline"]));
        assert!(provider_config(&config).unwrap().base_url.is_none());
    }

    #[test]
    fn output_falls_back_to_config_then_table() {
        let mut config = Config::default();
        config.defaults.output = "yaml".into();
        assert_eq!(output_format(&global(&[]), &config), OutputFormat::Yaml);
        assert_eq!(
            output_format(&global(&["-o", "plain"]), &config),
            OutputFormat::Plain
        );
        config.defaults.output = "xml".into();
        assert_eq!(output_format(&global(&[]), &config), OutputFormat::Table);
    }
}
