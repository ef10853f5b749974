// ── Site and turbine domain types ──

use serde::{Deserialize, Serialize};

/// A wind park. Static reference data, never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub name: String,
}

/// A single turbine (asset). Belongs to exactly one [`Site`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Turbine {
    pub id: String,
    pub site_id: String,
    pub name: String,
}
