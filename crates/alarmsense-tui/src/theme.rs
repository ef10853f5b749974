//! Palette and semantic styles for the dashboard.

use ratatui::style::{Color, Modifier, Style};

use alarmsense_core::{DataSource, Priority};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29

// ── Semantic Styles ───────────────────────────────────────────────────

pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn border_error() -> Style {
    Style::default().fg(ERROR_RED)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn field_error() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Placeholder and disabled text.
pub fn muted() -> Style {
    Style::default().fg(BORDER_GRAY).add_modifier(Modifier::ITALIC)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

// ── Lookups ───────────────────────────────────────────────────────────

/// Badge text and style for a priority. Every variant has exactly one entry.
pub fn priority_badge(priority: Priority) -> (&'static str, Style) {
    match priority {
        Priority::P1 => (
            "P1 CRITICAL",
            Style::default()
                .fg(ERROR_RED)
                .add_modifier(Modifier::BOLD),
        ),
        Priority::P2 => ("P2 MODERATE", Style::default().fg(ELECTRIC_YELLOW)),
    }
}

/// Status-bar indicator for where the data came from.
pub fn source_indicator(source: Option<&DataSource>) -> (&'static str, Style) {
    match source {
        Some(DataSource::Live) => ("● LIVE", Style::default().fg(SUCCESS_GREEN)),
        Some(DataSource::Fallback { .. }) => (
            "◐ OFFLINE-MOCK",
            Style::default()
                .fg(ELECTRIC_YELLOW)
                .add_modifier(Modifier::BOLD),
        ),
        None => ("○ --", key_hint()),
    }
}
