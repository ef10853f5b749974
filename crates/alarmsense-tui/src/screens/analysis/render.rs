//! Drawing for the analysis screen. Overlays are drawn last so menus and
//! popups sit on top of the table.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table},
};

use alarmsense_core::{FieldError, FilterField, RootCauseResult};

use super::{AnalysisScreen, FormFocus};
use crate::theme;

const TABLE_HEADERS: [&str; 8] = [
    "ID",
    "Start",
    "End",
    "Duration",
    "Root Cause",
    "Code",
    "Class",
    "Priority",
];

fn error_text(error: Option<FieldError>) -> Option<&'static str> {
    error.map(|e| match e {
        FieldError::Required => "Required",
        FieldError::InvalidRange => "Invalid range",
    })
}

fn duration_text(record: &RootCauseResult) -> String {
    record
        .rounded_duration_minutes()
        .map_or_else(|| "-".into(), |m| format!("{m} min"))
}

/// A rect of at most `width` x `height`, centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

struct FormAreas {
    site: Rect,
    turbine: Rect,
    start: Rect,
    end: Rect,
}

impl AnalysisScreen {
    pub(super) fn render_screen(&self, frame: &mut Frame, area: Rect) {
        let [form, toolbar, table, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(area);

        let fields = self.render_form(frame, form);
        self.render_toolbar(frame, toolbar);
        self.render_results(frame, table);
        self.render_footer(frame, footer);

        // ── Overlays ──
        self.site_dropdown.render_menu(frame, fields.site, area);
        self.turbine_dropdown.render_menu(frame, fields.turbine, area);
        self.start_picker.render_popup(frame, fields.start, area);
        self.end_picker.render_popup(frame, fields.end, area);
        self.popover.render(frame, table, &self.criteria);
        if self.details_open {
            if let Some(record) = self.selected_record() {
                render_details(frame, area, record);
            }
        }
    }

    fn render_form(&self, frame: &mut Frame, area: Rect) -> FormAreas {
        let [site, turbine, start, end, search, reset] = Layout::horizontal([
            Constraint::Percentage(24),
            Constraint::Percentage(24),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Length(12),
            Constraint::Length(11),
        ])
        .areas(area);

        let filter = self.search.filter();
        let errors = self.search.errors();
        let error = |field: FilterField| error_text(errors.get(field));

        self.site_dropdown.render_field(
            frame,
            site,
            &filter.site_id,
            self.focus == FormFocus::Site,
            error(FilterField::SiteId),
        );
        self.turbine_dropdown.render_field(
            frame,
            turbine,
            &filter.turbine_id,
            self.focus == FormFocus::Turbine,
            error(FilterField::TurbineId),
        );
        self.start_picker.render_field(
            frame,
            start,
            filter.start_date_time,
            self.focus == FormFocus::Start,
            error(FilterField::StartDateTime),
        );
        self.end_picker.render_field(
            frame,
            end,
            filter.end_date_time,
            self.focus == FormFocus::End,
            error(FilterField::EndDateTime),
        );

        let search_label = if self.search.is_loading() {
            "Searching"
        } else {
            "Search"
        };
        render_button(frame, search, search_label, self.focus == FormFocus::Search);
        render_button(frame, reset, "Reset", self.focus == FormFocus::Reset);

        FormAreas {
            site,
            turbine,
            start,
            end,
        }
    }

    fn render_toolbar(&self, frame: &mut Frame, area: Rect) {
        let filter_state = if self.criteria.is_active() {
            Span::styled(
                "● filters on",
                Style::default()
                    .fg(theme::ELECTRIC_YELLOW)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("○ no filters", theme::key_hint())
        };
        let mut spans = vec![
            Span::raw(" "),
            filter_state,
            Span::styled(format!(" ({}) ", self.criteria.mode), theme::key_hint()),
        ];
        if self.search.has_searched() && !self.search.is_loading() {
            spans.push(Span::styled(
                format!(
                    "│ {} of {} root causes ",
                    self.filtered.len(),
                    self.search.results().len()
                ),
                theme::table_row(),
            ));
        }
        spans.extend([
            Span::styled("│ ", theme::key_hint()),
            Span::styled("f", theme::key_hint_key()),
            Span::styled(" filter  ", theme::key_hint()),
            Span::styled("p", theme::key_hint_key()),
            Span::styled(format!(" {}/page  ", self.pager.page_size()), theme::key_hint()),
            Span::styled("e", theme::key_hint_key()),
            Span::styled(" export  ", theme::key_hint()),
            Span::styled("s", theme::key_hint_key()),
            Span::styled(" search  ", theme::key_hint()),
            Span::styled("R", theme::key_hint_key()),
            Span::styled(" reset", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focus == FormFocus::Results {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Root Cause Investigation ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.search.is_loading() {
            let throbber = throbber_widgets_tui::Throbber::default()
                .label(" Searching root causes...")
                .style(Style::default().fg(theme::NEON_CYAN))
                .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
            let spot = centered(inner, 28, 1);
            frame.render_stateful_widget(throbber, spot, &mut self.throbber.clone());
            return;
        }

        if self.filtered.is_empty() {
            let (title, hint) = if self.search.has_searched() {
                ("Query returned 0 results", "Adjust the window or clear filters")
            } else {
                (
                    "Ready for Analysis",
                    "Pick a site, turbine and window, then press s",
                )
            };
            let spot = centered(inner, inner.width, 2);
            let text = vec![
                Line::from(Span::styled(title, theme::title_style())),
                Line::from(Span::styled(hint, theme::key_hint())),
            ];
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), spot);
            return;
        }

        let header = Row::new(
            TABLE_HEADERS
                .iter()
                .map(|h| Cell::from(*h).style(theme::table_header())),
        );
        let rows: Vec<Row> = self
            .page_rows()
            .iter()
            .map(|r| {
                let (badge, badge_style) = theme::priority_badge(r.priority);
                Row::new(vec![
                    Cell::from(r.id.clone()),
                    Cell::from(r.start_label()),
                    Cell::from(r.end_label()),
                    Cell::from(duration_text(r)),
                    Cell::from(r.root_cause_name.clone()),
                    Cell::from(r.alarm_code.clone()),
                    Cell::from(r.class.clone()),
                    Cell::from(badge).style(badge_style),
                ])
                .style(theme::table_row())
            })
            .collect();
        let widths = [
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(8),
            Constraint::Min(18),
            Constraint::Length(9),
            Constraint::Length(11),
            Constraint::Length(12),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");
        let mut state = self.table_state;
        frame.render_stateful_widget(table, inner, &mut state);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(format!(" {}", self.pager.label()), theme::table_row()),
            Span::raw("  "),
            page_arrow("◂", self.pager.has_prev()),
            Span::styled(
                format!(" page {}/{} ", self.pager.page(), self.pager.total_pages()),
                theme::key_hint(),
            ),
            page_arrow("▸", self.pager.has_next()),
            Span::raw("  "),
            Span::styled("←/→", theme::key_hint_key()),
            Span::styled(" page  ", theme::key_hint()),
            Span::styled("Home/End", theme::key_hint_key()),
            Span::styled(" first/last  ", theme::key_hint()),
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" details", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Bright when that direction has another page, muted otherwise.
fn page_arrow(glyph: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(glyph, theme::key_hint_key())
    } else {
        Span::styled(glyph, theme::muted())
    }
}

fn render_button(frame: &mut Frame, area: Rect, label: &str, focused: bool) {
    let (border, text) = if focused {
        (theme::border_focused(), theme::table_selected())
    } else {
        (theme::border_default(), theme::table_row())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border);
    frame.render_widget(
        Paragraph::new(Span::styled(label.to_owned(), text))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_details(frame: &mut Frame, area: Rect, record: &RootCauseResult) {
    let popup = centered(area, 64, 14);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Alarm Investigation ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let (badge, badge_style) = theme::priority_badge(record.priority);
    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<12}"), theme::key_hint()),
            Span::styled(value, theme::table_row()),
        ])
    };
    let duration = record
        .rounded_duration_minutes()
        .map_or_else(|| "-".into(), |m| format!("{m} mins"));

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("  {}  ", record.alarm_code), theme::title_style()),
            Span::styled(badge, badge_style),
        ]),
        Line::from(""),
        Line::from(Span::styled("  Identified Root Cause", theme::key_hint())),
        Line::from(Span::styled(
            format!("  {}", record.root_cause_name),
            Style::default()
                .fg(theme::CORAL)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Alarm ID", record.id.clone()),
        field("Class", record.class.clone()),
        field("Start Time", record.start_label()),
        field("End Time", record.end_label()),
        field("Duration", duration),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Esc", theme::key_hint_key()),
            Span::styled(" close", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
