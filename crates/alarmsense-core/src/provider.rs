// ── Data provider ──
//
// The one data-access point for both binaries. Built once at startup and
// passed down explicitly (cheap to clone). Transport failures are never
// returned as errors: they are logged and replaced by the demo dataset,
// with `DataSource::Fallback` recording why.

use alarmsense_api::{AlarmClient, RootCauseQuery, TransportConfig};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::convert::{root_causes_from_wire, site_from_wire, turbine_from_wire};
use crate::error::CoreError;
use crate::mock;
use crate::model::{AlarmFilter, RootCauseResult, Site, Turbine};

const OFFLINE_REASON: &str = "no backend configured";

// ── Source flag ─────────────────────────────────────────────────────

/// Where a piece of data came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataSource {
    /// Returned by the backend.
    Live,
    /// Demo data substituted for a failed or missing backend.
    Fallback { reason: String },
}

impl DataSource {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn is_fallback(&self) -> bool {
        !self.is_live()
    }

    /// Short status label for status bars.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Fallback { .. } => "OFFLINE-MOCK",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Live => None,
            Self::Fallback { reason } => Some(reason),
        }
    }
}

/// Data tagged with its [`DataSource`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    pub data: T,
    pub source: DataSource,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            data,
            source: DataSource::Live,
        }
    }

    pub fn fallback(data: T, reason: impl Into<String>) -> Self {
        Self {
            data,
            source: DataSource::Fallback {
                reason: reason.into(),
            },
        }
    }
}

// ── Provider ────────────────────────────────────────────────────────

/// Site, turbine and root-cause lookups with demo-data fallback.
#[derive(Debug, Clone, Default)]
pub struct Provider {
    client: Option<AlarmClient>,
}

impl Provider {
    /// A provider backed by `client`.
    pub fn new(client: AlarmClient) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// A provider that always serves the demo dataset.
    pub fn offline() -> Self {
        Self { client: None }
    }

    /// Build from runtime configuration. Fails only if the HTTP client
    /// itself cannot be constructed.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, CoreError> {
        let Some(base_url) = config.base_url.clone() else {
            debug!("no backend URL configured, running offline");
            return Ok(Self::offline());
        };
        let transport = TransportConfig::default()
            .with_timeout(config.timeout)
            .with_tls(config.tls);
        let client = AlarmClient::new(base_url, &transport)?;
        Ok(Self::new(client))
    }

    pub fn is_offline(&self) -> bool {
        self.client.is_none()
    }

    /// List all sites.
    pub async fn list_sites(&self) -> Sourced<Vec<Site>> {
        let Some(client) = &self.client else {
            return Sourced::fallback(mock::sites(), OFFLINE_REASON);
        };
        match client.list_sites().await {
            Ok(wire) => Sourced::live(
                wire.into_iter()
                    .enumerate()
                    .map(|(i, w)| site_from_wire(w, i))
                    .collect(),
            ),
            Err(e) => {
                let err = CoreError::from(e);
                warn!(error = %err, "site lookup failed, serving demo sites");
                Sourced::fallback(mock::sites(), err.to_string())
            }
        }
    }

    /// List the turbines of one site. An empty `site_id` returns an empty
    /// list without touching the backend.
    pub async fn list_turbines(&self, site_id: &str) -> Sourced<Vec<Turbine>> {
        if site_id.trim().is_empty() {
            return Sourced::live(Vec::new());
        }
        let Some(client) = &self.client else {
            return Sourced::fallback(mock::turbines_for(site_id), OFFLINE_REASON);
        };
        match client.list_turbines(site_id).await {
            Ok(wire) => Sourced::live(
                wire.into_iter()
                    .enumerate()
                    .map(|(i, w)| turbine_from_wire(w, i, site_id))
                    .collect(),
            ),
            Err(e) => {
                let err = CoreError::from(e);
                warn!(site_id, error = %err, "turbine lookup failed, serving demo turbines");
                Sourced::fallback(mock::turbines_for(site_id), err.to_string())
            }
        }
    }

    /// Find root-cause candidates for `filter`.
    ///
    /// A response containing a record outside the P1/P2 priority domain is
    /// rejected as a whole and treated like a transport failure.
    pub async fn find_root_cause(&self, filter: &AlarmFilter) -> Sourced<Vec<RootCauseResult>> {
        let Some(client) = &self.client else {
            return Sourced::fallback(mock::root_causes_for(filter), OFFLINE_REASON);
        };
        let query = RootCauseQuery::from(filter);
        let converted = match client.find_root_cause(&query).await {
            Ok(wire) => root_causes_from_wire(wire),
            Err(e) => Err(CoreError::from(e)),
        };
        match converted {
            Ok(results) => {
                debug!(count = results.len(), "root-cause search returned");
                Sourced::live(results)
            }
            Err(err) => {
                warn!(error = %err, "root-cause search failed, serving demo results");
                Sourced::fallback(mock::root_causes_for(filter), err.to_string())
            }
        }
    }
}
