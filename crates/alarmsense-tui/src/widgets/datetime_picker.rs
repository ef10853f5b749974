//! Calendar date-time picker.
//!
//! The popup browses months independently of the committed value. A draft
//! holds the pending choice: picking a day keeps the draft's hour and
//! minute, and the time spinners wrap within 0-23 and 0-59. Nothing leaves
//! the picker until the user confirms; Esc or losing focus drops the draft.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::theme;

const WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Which part of the open popup receives arrow keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickerFocus {
    #[default]
    Day,
    Hour,
    Minute,
}

impl PickerFocus {
    fn next(self) -> Self {
        match self {
            Self::Day => Self::Hour,
            Self::Hour => Self::Minute,
            Self::Minute => Self::Day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Ignored,
    Consumed,
    Confirmed(DateTime<Utc>),
    Cancelled,
}

// ── Calendar math ─────────────────────────────────────────────────────

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = first.and_then(|d| d.checked_add_months(Months::new(1)));
    match (first, next) {
        (Some(first), Some(next)) => u32::try_from((next - first).num_days()).unwrap_or(31),
        _ => 31,
    }
}

/// Sunday-first grid: one `None` per weekday before the 1st, then each day.
pub fn calendar_grid(year: i32, month: u32) -> Vec<Option<u32>> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let blanks = first.weekday().num_days_from_sunday();
    (0..blanks)
        .map(|_| None)
        .chain((1..=days_in_month(year, month)).map(Some))
        .collect()
}

// ── Picker state ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct DateTimePicker {
    label: &'static str,
    open: bool,
    /// Day under the cursor. Its month is the month on display.
    cursor: NaiveDate,
    draft: Option<NaiveDateTime>,
    focus: PickerFocus,
}

impl DateTimePicker {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            open: false,
            cursor: NaiveDate::default(),
            draft: None,
            focus: PickerFocus::Day,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open on the committed value, or on `today` when there is none.
    pub fn open(&mut self, committed: Option<DateTime<Utc>>, today: NaiveDate) {
        self.draft = committed.map(|c| c.naive_utc());
        self.cursor = self.draft.map_or(today, |d| d.date());
        self.focus = PickerFocus::Day;
        self.open = true;
    }

    /// Discard the draft.
    pub fn close(&mut self) {
        self.open = false;
        self.draft = None;
    }

    /// Put the cursor's day into the draft, keeping its time of day.
    pub fn select_day(&mut self) {
        let time = self.draft.map_or(NaiveTime::MIN, |d| d.time());
        self.draft = Some(self.cursor.and_time(time));
    }

    pub fn shift_month(&mut self, forward: bool) {
        let months = Months::new(1);
        let moved = if forward {
            self.cursor.checked_add_months(months)
        } else {
            self.cursor.checked_sub_months(months)
        };
        if let Some(date) = moved {
            self.cursor = date;
        }
    }

    fn move_cursor(&mut self, days: i64) {
        if let Some(date) = self
            .cursor
            .checked_add_signed(chrono::TimeDelta::days(days))
        {
            self.cursor = date;
        }
    }

    /// Step hour or minute by `delta`, wrapping. No-op without a draft.
    fn spin(&mut self, delta: i32) {
        let Some(draft) = self.draft else {
            return;
        };
        let updated = match self.focus {
            PickerFocus::Hour => draft.with_hour(wrap(draft.hour(), delta, 24)),
            PickerFocus::Minute => draft.with_minute(wrap(draft.minute(), delta, 60)),
            PickerFocus::Day => None,
        };
        if let Some(updated) = updated {
            self.draft = Some(updated);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerOutcome {
        if !self.open {
            return PickerOutcome::Ignored;
        }
        match code {
            KeyCode::Esc => {
                self.close();
                PickerOutcome::Cancelled
            }
            KeyCode::Enter => {
                let draft = self.draft;
                self.close();
                match draft {
                    Some(d) => PickerOutcome::Confirmed(d.and_utc()),
                    None => PickerOutcome::Cancelled,
                }
            }
            KeyCode::Tab => {
                self.focus = self.focus.next();
                PickerOutcome::Consumed
            }
            KeyCode::PageUp | KeyCode::Char('<') => {
                self.shift_month(false);
                PickerOutcome::Consumed
            }
            KeyCode::PageDown | KeyCode::Char('>') => {
                self.shift_month(true);
                PickerOutcome::Consumed
            }
            KeyCode::Char(' ') if self.focus == PickerFocus::Day => {
                self.select_day();
                PickerOutcome::Consumed
            }
            KeyCode::Left if self.focus == PickerFocus::Day => {
                self.move_cursor(-1);
                PickerOutcome::Consumed
            }
            KeyCode::Right if self.focus == PickerFocus::Day => {
                self.move_cursor(1);
                PickerOutcome::Consumed
            }
            KeyCode::Up if self.focus == PickerFocus::Day => {
                self.move_cursor(-7);
                PickerOutcome::Consumed
            }
            KeyCode::Down if self.focus == PickerFocus::Day => {
                self.move_cursor(7);
                PickerOutcome::Consumed
            }
            KeyCode::Up => {
                self.spin(1);
                PickerOutcome::Consumed
            }
            KeyCode::Down => {
                self.spin(-1);
                PickerOutcome::Consumed
            }
            _ => PickerOutcome::Consumed,
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        committed: Option<DateTime<Utc>>,
        focused: bool,
        error: Option<&str>,
    ) {
        let border = if error.is_some() {
            theme::border_error()
        } else if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let mut block = Block::default()
            .title(format!(" {} ", self.label))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        if let Some(err) = error {
            block = block.title_bottom(Span::styled(format!(" {err} "), theme::field_error()));
        }
        let body = committed.map_or_else(
            || Span::styled("Select date & time", theme::muted()),
            |c| Span::styled(c.format(DISPLAY_FORMAT).to_string(), theme::table_row()),
        );
        frame.render_widget(Paragraph::new(Line::from(body)).block(block), area);
    }

    pub fn render_popup(&self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.open {
            return;
        }
        let width = 30u16.min(bounds.width);
        let height = 14u16;
        let x = anchor.x.min(bounds.right().saturating_sub(width));
        let y = if anchor.bottom().saturating_add(height) <= bounds.bottom() {
            anchor.bottom()
        } else {
            anchor.y.saturating_sub(height)
        };
        let area = Rect::new(x, y, width, height).intersection(bounds);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(format!(" {} ", self.cursor.format("%B %Y")))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(self.popup_lines()), inner);
    }

    fn popup_lines(&self) -> Vec<Line<'static>> {
        let (year, month) = (self.cursor.year(), self.cursor.month());
        let draft_day = self
            .draft
            .filter(|d| d.year() == year && d.month() == month)
            .map(|d| d.day());

        let mut lines = vec![Line::from(Span::styled(
            format!(" {}", WEEKDAYS.join(" ")),
            theme::key_hint(),
        ))];

        for week in calendar_grid(year, month).chunks(7) {
            let mut spans = vec![Span::raw(" ")];
            for cell in week {
                let span = match cell {
                    None => Span::raw("   "),
                    Some(day) => {
                        let mut style = theme::table_row();
                        if Some(*day) == draft_day {
                            style = style.fg(theme::NEON_CYAN).add_modifier(Modifier::BOLD);
                        }
                        if *day == self.cursor.day() && self.focus == PickerFocus::Day {
                            style = theme::table_selected();
                        }
                        Span::styled(format!("{day:>2} "), style)
                    }
                };
                spans.push(span);
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        let (hour, minute) = self
            .draft
            .map_or((None, None), |d| (Some(d.hour()), Some(d.minute())));
        let spinner = |value: Option<u32>, focus: PickerFocus| {
            let text = value.map_or_else(|| "--".to_owned(), |v| format!("{v:02}"));
            let style = if self.focus == focus {
                theme::table_selected()
            } else {
                theme::table_row()
            };
            Span::styled(text, style)
        };
        lines.push(Line::from(vec![
            Span::styled(" Time ", theme::key_hint()),
            spinner(hour, PickerFocus::Hour),
            Span::raw(":"),
            spinner(minute, PickerFocus::Minute),
        ]));
        lines.push(Line::from(vec![
            Span::styled(" ␣", theme::key_hint_key()),
            Span::styled(" day ", theme::key_hint()),
            Span::styled("Tab", theme::key_hint_key()),
            Span::styled(" time ", theme::key_hint()),
            Span::styled("⏎", theme::key_hint_key()),
            Span::styled(" ok", theme::key_hint()),
        ]));
        lines
    }
}

fn wrap(value: u32, delta: i32, modulus: i32) -> u32 {
    let current = i32::try_from(value).unwrap_or(0);
    u32::try_from((current + delta).rem_euclid(modulus)).unwrap_or(0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn grid_is_sunday_first_with_leading_blanks() {
        // 1 May 2024 was a Wednesday.
        let grid = calendar_grid(2024, 5);
        assert_eq!(&grid[..4], &[None, None, None, Some(1)]);
        assert_eq!(grid.len(), 3 + 31);
        // 1 Sep 2024 was a Sunday.
        assert_eq!(calendar_grid(2024, 9).first(), Some(&Some(1)));
    }

    #[test]
    fn month_lengths() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }

    #[test]
    fn selecting_day_keeps_time() {
        let mut p = DateTimePicker::new("Start");
        p.open(Some(at(2024, 5, 2, 8, 30)), today());
        p.handle_key(KeyCode::Right);
        p.handle_key(KeyCode::Char(' '));
        assert_eq!(
            p.handle_key(KeyCode::Enter),
            PickerOutcome::Confirmed(at(2024, 5, 3, 8, 30))
        );
    }

    #[test]
    fn fresh_selection_starts_at_midnight() {
        let mut p = DateTimePicker::new("Start");
        p.open(None, today());
        p.handle_key(KeyCode::Char(' '));
        assert_eq!(p.draft, Some(today().and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn hour_and_minute_wrap() {
        let mut p = DateTimePicker::new("End");
        p.open(Some(at(2024, 5, 2, 23, 59)), today());
        p.handle_key(KeyCode::Tab);
        assert_eq!(p.focus, PickerFocus::Hour);
        p.handle_key(KeyCode::Up);
        p.handle_key(KeyCode::Tab);
        p.handle_key(KeyCode::Up);
        assert_eq!(p.draft, Some(at(2024, 5, 2, 0, 0).naive_utc()));
        p.handle_key(KeyCode::Down);
        assert_eq!(p.draft.unwrap().minute(), 59);
    }

    #[test]
    fn time_spinners_need_a_day_first() {
        let mut p = DateTimePicker::new("End");
        p.open(None, today());
        p.handle_key(KeyCode::Tab);
        p.handle_key(KeyCode::Up);
        assert_eq!(p.draft, None);
    }

    #[test]
    fn month_navigation_leaves_draft_alone() {
        let mut p = DateTimePicker::new("Start");
        p.open(Some(at(2024, 1, 31, 6, 0)), today());
        p.handle_key(KeyCode::PageDown);
        assert_eq!(p.cursor, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(p.draft, Some(at(2024, 1, 31, 6, 0).naive_utc()));
    }

    #[test]
    fn escape_discards_draft() {
        let mut p = DateTimePicker::new("Start");
        p.open(Some(at(2024, 5, 2, 8, 30)), today());
        p.handle_key(KeyCode::Right);
        p.handle_key(KeyCode::Char(' '));
        assert_eq!(p.handle_key(KeyCode::Esc), PickerOutcome::Cancelled);
        assert!(!p.is_open());
        assert_eq!(p.draft, None);
    }

    #[test]
    fn confirm_without_selection_emits_nothing() {
        let mut p = DateTimePicker::new("Start");
        p.open(None, today());
        assert_eq!(p.handle_key(KeyCode::Enter), PickerOutcome::Cancelled);
    }
}
