// ── Core error types ──
//
// Errors from alarmsense-core. Transport failures never reach the UI as
// errors: the provider turns them into fallback data and keeps the message
// as the fallback reason. The variants below are what remains.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend ──────────────────────────────────────────────────────
    #[error("Backend request failed: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Invalid backend URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A record carried a priority outside the P1/P2 domain (e.g. the
    /// retired High/Medium/Low scheme). Never coerced.
    #[error("Unsupported priority {value:?} on record {id} (expected P1 or P2)")]
    UnsupportedPriority { id: String, value: String },

    // ── Search ───────────────────────────────────────────────────────
    #[error("Page size {size} is not one of 5, 10, 25")]
    InvalidPageSize { size: usize },

    // ── Export ───────────────────────────────────────────────────────
    #[error("Nothing to export: the result set is empty")]
    NothingToExport,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<alarmsense_api::Error> for CoreError {
    fn from(err: alarmsense_api::Error) -> Self {
        let status = err.status();
        match err {
            alarmsense_api::Error::InvalidUrl(e) => CoreError::InvalidUrl {
                url: String::new(),
                reason: e.to_string(),
            },
            other => CoreError::Api {
                message: other.to_string(),
                status,
            },
        }
    }
}
