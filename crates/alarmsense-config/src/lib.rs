//! Shared configuration for the AlarmSense CLI and TUI.
//!
//! Layering: built-in defaults, then `config.toml` from the platform config
//! directory, then `ALARMSENSE_*` environment variables. The CLI applies its
//! flags on top; both binaries turn the result into a
//! [`ProviderConfig`](alarmsense_core::ProviderConfig).

use std::path::{Path, PathBuf};
use std::time::Duration;

use alarmsense_api::TlsMode;
use alarmsense_core::{MatchMode, PAGE_SIZE_OPTIONS, ProviderConfig};
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Used when no backend is configured and the user asks for one anyway
/// (`config init`).
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/alarmsense";

const ENV_PREFIX: &str = "ALARMSENSE_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,

    #[serde(default)]
    pub defaults: Defaults,
}

/// Where the alarm backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Backend {
    /// Backend root. Absent means offline: demo data only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

impl Default for Backend {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
            insecure: false,
        }
    }
}

/// Presentation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub match_mode: MatchMode,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            page_size: default_page_size(),
            match_mode: MatchMode::default(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_page_size() -> usize {
    alarmsense_core::DEFAULT_PAGE_SIZE
}

impl Config {
    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PAGE_SIZE_OPTIONS.contains(&self.defaults.page_size) {
            return Err(ConfigError::Validation {
                field: "defaults.page_size".into(),
                reason: format!(
                    "expected one of {PAGE_SIZE_OPTIONS:?}, got {}",
                    self.defaults.page_size
                ),
            });
        }
        if self.backend.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "backend.timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// Translate into the runtime provider configuration.
    pub fn provider_config(&self) -> Result<ProviderConfig, ConfigError> {
        let base_url = self
            .backend
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|raw| {
                raw.parse::<url::Url>()
                    .map_err(|e| ConfigError::Validation {
                        field: "backend.base_url".into(),
                        reason: format!("invalid URL {raw:?}: {e}"),
                    })
            })
            .transpose()?;

        Ok(ProviderConfig {
            base_url,
            timeout: Duration::from_secs(self.backend.timeout),
            tls: if self.backend.insecure {
                TlsMode::DangerAcceptInvalid
            } else {
                TlsMode::System
            },
        })
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "alarmsense", "alarmsense")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || fallback_dir(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for log files and other local state.
pub fn data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || fallback_dir(".local/share"),
        |dirs| dirs.data_local_dir().to_path_buf(),
    )
}

fn fallback_dir(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push("alarmsense");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path + environment.
///
/// Nested keys use a double underscore: `ALARMSENSE_BACKEND__BASE_URL`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or broken.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.defaults.page_size, 10);
        assert_eq!(cfg.backend.timeout, 30);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"http://scada:9000/api/alarmsense\"\ntimeout = 5\n\n\
             [defaults]\npage_size = 25\nmatch_mode = \"tokens\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.page_size, 25);
        assert_eq!(cfg.defaults.match_mode, MatchMode::Tokens);

        let provider = cfg.provider_config().unwrap();
        assert_eq!(
            provider.base_url.unwrap().as_str(),
            "http://scada:9000/api/alarmsense"
        );
        assert_eq!(provider.timeout, Duration::from_secs(5));
        assert_eq!(provider.tls, TlsMode::System);
    }

    #[test]
    fn bad_page_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\npage_size = 7\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { ref field, .. }) if field == "defaults.page_size"
        ));
    }

    #[test]
    fn bad_url_is_rejected() {
        let mut cfg = Config::default();
        cfg.backend.base_url = Some("not a url".into());
        assert!(cfg.provider_config().is_err());
    }

    #[test]
    fn blank_url_means_offline() {
        let mut cfg = Config::default();
        cfg.backend.base_url = Some("  ".into());
        assert!(cfg.provider_config().unwrap().base_url.is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = Config::default();
        cfg.backend.base_url = Some(DEFAULT_BASE_URL.into());
        cfg.backend.insecure = true;
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(
            loaded.provider_config().unwrap().tls,
            TlsMode::DangerAcceptInvalid
        );
    }
}
