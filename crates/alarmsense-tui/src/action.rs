//! Everything the event loop, the data bridge and the screens say to each
//! other travels as an [`Action`] over one unbounded channel.

use alarmsense_core::{RootCauseResult, SearchTicket, Site, Sourced, Turbine};

/// A toast shown in the bottom-right corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── Data requests (app → data bridge) ──
    RequestSites,
    RequestTurbines(String),
    RequestSearch(SearchTicket),

    // ── Data responses (data bridge → screens) ──
    SitesLoaded(Sourced<Vec<Site>>),
    TurbinesLoaded {
        site_id: String,
        response: Sourced<Vec<Turbine>>,
    },
    SearchCompleted {
        generation: u64,
        response: Sourced<Vec<RootCauseResult>>,
    },

    // ── Status bar ──
    SampleTelemetry,

    // ── Notifications ──
    Notify(Notification),
    DismissNotification,
}
