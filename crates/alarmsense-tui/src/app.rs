//! Application core: event loop, action dispatch, chrome (header, sidebar,
//! status bar) and the global overlays.

use std::time::{Duration, Instant};

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use alarmsense_config::Config;
use alarmsense_core::{DataSource, Provider, Site};

use crate::action::{Action, Notification, NotificationLevel};
use crate::component::Component;
use crate::data_bridge::DataBridge;
use crate::event::{Event, EventReader, Rates};
use crate::screens::analysis::AnalysisScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::telemetry::Telemetry;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const SIDEBAR_WIDTH: u16 = 22;

pub struct App {
    screen: AnalysisScreen,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    bridge: DataBridge,
    notification: Option<(Notification, Instant)>,
    telemetry: Telemetry,
    /// `None` until the first site list arrives.
    sites: Option<Vec<Site>>,
    /// Source of the most recent response of any kind.
    source: Option<DataSource>,
}

impl App {
    pub fn new(provider: Provider, config: &Config) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let bridge = DataBridge::new(provider, action_tx.clone());
        Self {
            screen: AnalysisScreen::new(config.defaults.page_size, config.defaults.match_mode),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
            bridge,
            notification: None,
            telemetry: Telemetry::default(),
            sites: None,
            source: None,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        let mut events = EventReader::new(Rates::default());
        self.action_tx.send(Action::RequestSites)?;
        info!(
            screen = self.screen.id(),
            offline = self.bridge.is_offline(),
            "TUI event loop started"
        );

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
                Event::Sample => Some(Action::SampleTelemetry),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;
                if matches!(action, Action::Render) {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.bridge.shutdown();
        events.stop();
        tui.exit();
        info!("TUI event loop ended");
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }
        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }
        if !self.screen.captures_input() && key.modifiers == KeyModifiers::NONE {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                _ => {}
            }
        }
        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::Resize(w, h) => {
                debug!(w, h, "terminal resized");
                self.action_tx.send(Action::Render)?;
            }
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Render => {}

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown)| shown.elapsed() > NOTIFICATION_TTL)
                {
                    self.action_tx.send(Action::DismissNotification)?;
                }
                self.forward(action)?;
            }

            Action::SampleTelemetry => self.telemetry.step(&mut rand::thread_rng()),

            // ── Requests ──
            Action::RequestSites => self.bridge.fetch_sites(),
            Action::RequestTurbines(site_id) => self.bridge.fetch_turbines(site_id.clone()),
            Action::RequestSearch(ticket) => self.bridge.search(ticket.clone()),

            // ── Responses ──
            Action::SitesLoaded(response) => {
                self.sites = Some(response.data.clone());
                self.note_source(&response.source)?;
                self.forward(action)?;
            }
            Action::TurbinesLoaded { response, .. } => {
                self.note_source(&response.source)?;
                self.forward(action)?;
            }
            Action::SearchCompleted { response, .. } => {
                let was_loading = self.screen.is_loading();
                self.forward(action)?;
                // A stale response leaves the screen loading; only an applied
                // one moves the indicator.
                if was_loading && !self.screen.is_loading() {
                    self.note_source(&response.source)?;
                }
            }

            Action::Notify(notification) => {
                debug!(message = %notification.message, "notification");
                self.notification = Some((notification.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    /// Record where data came from; warn once when we drop to demo data.
    fn note_source(&mut self, source: &DataSource) -> Result<()> {
        let was_fallback = self.source.as_ref().is_some_and(DataSource::is_fallback);
        if let DataSource::Fallback { reason } = source {
            if !was_fallback {
                warn!(%reason, "serving demo data");
                self.action_tx.send(Action::Notify(Notification::warning(format!(
                    "Backend unavailable ({reason}), showing demo data"
                ))))?;
            }
        }
        self.source = Some(source.clone());
        Ok(())
    }

    fn node_name(&self) -> &str {
        match &self.sites {
            None => "Loading...",
            Some(sites) => sites.first().map_or("No Site", |s| s.name.as_str()),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .areas(area);
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(40)])
                .areas(body);

        self.render_header(frame, header);
        render_sidebar(frame, sidebar);
        self.screen.render(frame, main);
        self.render_status_bar(frame, status);

        if self.help_visible {
            render_help_overlay(frame, area);
        }
        if let Some((notification, _)) = &self.notification {
            render_notification(frame, area, notification);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let brand = Line::from(vec![
            Span::styled(" MYSITE 360 ", theme::title_style()),
            Span::styled("/ ", theme::key_hint()),
            Span::styled(
                "ALARM SENSE",
                Style::default()
                    .fg(theme::ELECTRIC_PURPLE)
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        frame.render_widget(Paragraph::new(brand), area);

        let user = Line::from(vec![
            Span::styled("Admin User", theme::table_row()),
            Span::styled(" (Site Supervisor) ", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(user).alignment(Alignment::Right), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let sep = || Span::styled(" │ ", theme::key_hint());
        let (source_label, source_style) = theme::source_indicator(self.source.as_ref());
        let line = Line::from(vec![
            Span::styled(" ● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled("System Healthy", theme::table_row()),
            sep(),
            Span::styled("Node: ", theme::key_hint()),
            Span::styled(self.node_name().to_owned(), theme::table_row()),
            sep(),
            Span::styled(self.telemetry.cpu_label(), theme::table_row()),
            sep(),
            Span::styled(self.telemetry.ram_label(), theme::table_row()),
            sep(),
            Span::styled(
                Utc::now().format("%d %b %Y %H:%M:%S UTC").to_string(),
                theme::table_row(),
            ),
            sep(),
            Span::styled(source_label, source_style),
            sep(),
            Span::styled("?", theme::key_hint_key()),
            Span::styled(" help  ", theme::key_hint()),
            Span::styled("q", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(" ▸ AlarmSense AI", theme::table_selected())),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 58u16.min(area.width.saturating_sub(4));
    let height = 24u16.min(area.height.saturating_sub(2));
    let help_area = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        ))
    };
    let key = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<12}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let lines = vec![
        section("Form"),
        key("Tab/S-Tab", "Next / previous field"),
        key("Enter ↓", "Open dropdown or picker"),
        key("s", "Search"),
        key("R", "Reset form and results"),
        Line::from(""),
        section("Date picker"),
        key("←→↑↓", "Move day"),
        key("Space", "Select day"),
        key("PgUp/PgDn", "Previous / next month"),
        key("Tab ↑↓", "Adjust hour / minute"),
        key("Enter / Esc", "Confirm / cancel"),
        Line::from(""),
        section("Results"),
        key("↑↓ j/k", "Select row"),
        key("Enter", "Alarm details"),
        key("←→ PgUp/PgDn", "Previous / next page"),
        key("p", "Cycle page size (5/10/25)"),
        key("f", "Filter results"),
        key("e", "Export CSV"),
        Line::from(""),
        key("? / q", "Help / quit"),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let chars = u16::try_from(notification.message.chars().count()).unwrap_or(u16::MAX);
    let width = chars.saturating_add(6).clamp(20, 70).min(area.width);
    let height = 3u16;
    let toast = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(height + 2),
        width,
        height,
    );

    let (color, icon) = match notification.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(notification.message.clone(), theme::table_row()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use alarmsense_core::{Sourced, mock};

    fn app() -> App {
        App::new(Provider::offline(), &Config::default())
    }

    fn drain(app: &mut App) -> Vec<Action> {
        std::iter::from_fn(|| app.action_rx.try_recv().ok()).collect()
    }

    #[test]
    fn node_name_follows_site_list() {
        let mut app = app();
        assert_eq!(app.node_name(), "Loading...");

        app.process_action(&Action::SitesLoaded(Sourced::live(Vec::new())))
            .unwrap();
        assert_eq!(app.node_name(), "No Site");

        let sites = mock::sites();
        let first = sites[0].name.clone();
        app.process_action(&Action::SitesLoaded(Sourced::live(sites)))
            .unwrap();
        assert_eq!(app.node_name(), first);
    }

    #[test]
    fn first_fallback_warns_once() {
        let mut app = app();
        let response = Sourced::fallback(mock::sites(), "connection refused");
        app.process_action(&Action::SitesLoaded(response.clone()))
            .unwrap();
        app.process_action(&Action::SitesLoaded(response)).unwrap();

        let warnings = drain(&mut app)
            .into_iter()
            .filter(|a| {
                matches!(a, Action::Notify(n) if n.level == NotificationLevel::Warning)
            })
            .count();
        assert_eq!(warnings, 1);
        assert!(app.source.as_ref().is_some_and(DataSource::is_fallback));
    }

    #[test]
    fn quit_and_help_keys_respect_capture() {
        let mut app = app();
        let q = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert!(matches!(app.handle_key_event(q).unwrap(), Some(Action::Quit)));

        let help = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert!(matches!(
            app.handle_key_event(help).unwrap(),
            Some(Action::ToggleHelp)
        ));
        app.process_action(&Action::ToggleHelp).unwrap();
        // While help is up, q does nothing.
        assert!(app.handle_key_event(q).unwrap().is_none());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        app.process_action(&Action::ToggleHelp).unwrap();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches!(app.handle_key_event(key).unwrap(), Some(Action::Quit)));
    }

    #[test]
    fn telemetry_moves_on_sample() {
        let mut app = app();
        let before = app.telemetry;
        for _ in 0..20 {
            app.process_action(&Action::SampleTelemetry).unwrap();
        }
        assert_ne!(app.telemetry, before);
    }
}
