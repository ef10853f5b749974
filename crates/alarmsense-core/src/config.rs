// ── Runtime provider configuration ──
//
// Describes *where* the backend lives and how to talk to it. Never touches
// disk: the CLI/TUI builds a `ProviderConfig` from `alarmsense-config`
// and hands it in.

use std::time::Duration;

use alarmsense_api::TlsMode;
use url::Url;

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Backend root, e.g. `http://localhost:8080/api/alarmsense`.
    /// `None` runs the provider offline on the demo dataset.
    pub base_url: Option<Url>,
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            tls: TlsMode::System,
        }
    }
}
