// alarmsense-api: Async Rust client for the AlarmSense root-cause backend
//
// Three endpoints, all relative to a configurable base URL:
//   GET  {base}/sites
//   GET  {base}/turbines?siteId=
//   POST {base}/rootcause

pub mod client;
pub mod error;
pub mod models;
pub mod rootcause;
pub mod sites;
pub mod transport;

pub use client::AlarmClient;
pub use error::Error;
pub use models::{RootCauseQuery, WireRootCause, WireSite, WireTurbine};
pub use transport::{TlsMode, TransportConfig};
