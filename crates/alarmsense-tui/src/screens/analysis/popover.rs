//! Result filter popover.
//!
//! Edits a [`ResultCriteria`] in place. Free text, the two window bounds
//! and the two duration bounds are typed; match mode and priority cycle.
//! Unparseable bounds are flagged and count as unset. Every edit reports
//! `Changed` so the table re-filters live.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tui_input::{Input, InputRequest};

use alarmsense_core::{MatchMode, PriorityFilter, ResultCriteria, convert::parse_timestamp};

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PopoverField {
    Search,
    Mode,
    Priority,
    From,
    To,
    MinDuration,
    MaxDuration,
    Clear,
}

const FIELDS: [PopoverField; 8] = [
    PopoverField::Search,
    PopoverField::Mode,
    PopoverField::Priority,
    PopoverField::From,
    PopoverField::To,
    PopoverField::MinDuration,
    PopoverField::MaxDuration,
    PopoverField::Clear,
];

impl PopoverField {
    fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Mode => "Match",
            Self::Priority => "Priority",
            Self::From => "From",
            Self::To => "To",
            Self::MinDuration => "Min (min)",
            Self::MaxDuration => "Max (min)",
            Self::Clear => "",
        }
    }

    fn step(self, forward: bool) -> Self {
        let len = FIELDS.len();
        let idx = FIELDS.iter().position(|f| *f == self).unwrap_or(0);
        let next = (if forward { idx + 1 } else { idx + len - 1 }) % len;
        FIELDS.get(next).copied().unwrap_or(Self::Search)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoverOutcome {
    Consumed,
    /// The criteria changed; re-filter.
    Changed,
    Closed,
}

#[derive(Debug, Default)]
pub struct FilterPopover {
    open: bool,
    focus: Option<PopoverField>,
    search: Input,
    from: Input,
    to: Input,
    min: Input,
    max: Input,
    invalid: BTreeSet<PopoverField>,
}

fn next_mode(mode: MatchMode) -> MatchMode {
    match mode {
        MatchMode::Substring => MatchMode::Tokens,
        MatchMode::Tokens => MatchMode::Fuzzy,
        MatchMode::Fuzzy => MatchMode::Substring,
    }
}

/// Parse a typed bound. Blank means unset; anything unparseable is
/// flagged and also counts as unset.
fn checked<T>(
    invalid: &mut BTreeSet<PopoverField>,
    field: PopoverField,
    input: &Input,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let raw = input.value().trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = parse(raw);
    if parsed.is_none() {
        invalid.insert(field);
    }
    parsed
}

/// A full timestamp, or a bare date read as midnight UTC.
fn parse_bound(raw: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(raw).or_else(|| {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    })
}

impl FilterPopover {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        self.open = true;
        self.focus = Some(PopoverField::Search);
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_invalid(&self, field: PopoverField) -> bool {
        self.invalid.contains(&field)
    }

    fn input_mut(&mut self, field: PopoverField) -> Option<&mut Input> {
        match field {
            PopoverField::Search => Some(&mut self.search),
            PopoverField::From => Some(&mut self.from),
            PopoverField::To => Some(&mut self.to),
            PopoverField::MinDuration => Some(&mut self.min),
            PopoverField::MaxDuration => Some(&mut self.max),
            _ => None,
        }
    }

    fn input(&self, field: PopoverField) -> Option<&Input> {
        match field {
            PopoverField::Search => Some(&self.search),
            PopoverField::From => Some(&self.from),
            PopoverField::To => Some(&self.to),
            PopoverField::MinDuration => Some(&self.min),
            PopoverField::MaxDuration => Some(&self.max),
            _ => None,
        }
    }

    /// Rebuild the typed parts of `criteria` from the inputs.
    fn sync(&mut self, criteria: &mut ResultCriteria) {
        self.invalid.clear();
        criteria.text = self.search.value().to_owned();
        let invalid = &mut self.invalid;
        criteria.from = checked(invalid, PopoverField::From, &self.from, parse_bound);
        criteria.to = checked(invalid, PopoverField::To, &self.to, parse_bound);
        criteria.min_duration = checked(invalid, PopoverField::MinDuration, &self.min, |raw| {
            raw.parse().ok()
        });
        criteria.max_duration = checked(invalid, PopoverField::MaxDuration, &self.max, |raw| {
            raw.parse().ok()
        });
    }

    fn clear(&mut self, criteria: &mut ResultCriteria) {
        for input in [
            &mut self.search,
            &mut self.from,
            &mut self.to,
            &mut self.min,
            &mut self.max,
        ] {
            input.reset();
        }
        self.invalid.clear();
        criteria.clear();
    }

    pub fn handle_key(&mut self, key: KeyEvent, criteria: &mut ResultCriteria) -> PopoverOutcome {
        let Some(focus) = self.focus else {
            return PopoverOutcome::Consumed;
        };
        match key.code {
            KeyCode::Esc => {
                self.close();
                return PopoverOutcome::Closed;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = Some(focus.step(true));
                return PopoverOutcome::Consumed;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = Some(focus.step(false));
                return PopoverOutcome::Consumed;
            }
            _ => {}
        }

        match focus {
            PopoverField::Mode => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    criteria.mode = next_mode(criteria.mode);
                    PopoverOutcome::Changed
                }
                _ => PopoverOutcome::Consumed,
            },
            PopoverField::Priority => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                    criteria.priority = criteria.priority.next();
                    PopoverOutcome::Changed
                }
                _ => PopoverOutcome::Consumed,
            },
            PopoverField::Clear => match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.clear(criteria);
                    PopoverOutcome::Changed
                }
                _ => PopoverOutcome::Consumed,
            },
            field => {
                if key.code == KeyCode::Enter {
                    self.close();
                    return PopoverOutcome::Closed;
                }
                let numeric = matches!(
                    field,
                    PopoverField::MinDuration | PopoverField::MaxDuration
                );
                let Some(request) = text_request(key, numeric) else {
                    return PopoverOutcome::Consumed;
                };
                let changed = self
                    .input_mut(field)
                    .and_then(|input| input.handle(request))
                    .is_some_and(|state| state.value);
                if changed {
                    self.sync(criteria);
                    PopoverOutcome::Changed
                } else {
                    PopoverOutcome::Consumed
                }
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, anchor: Rect, criteria: &ResultCriteria) {
        if !self.open {
            return;
        }
        let width = 46u16.min(anchor.width);
        let height = 12u16.min(anchor.height);
        let area = Rect::new(
            anchor.right().saturating_sub(width),
            anchor.y,
            width,
            height,
        );
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Filter Results ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = FIELDS
            .iter()
            .map(|field| self.field_line(*field, criteria))
            .collect();
        lines.push(Line::from(vec![
            Span::styled(" ↑↓", theme::key_hint_key()),
            Span::styled(" field  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" close", theme::key_hint()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn field_line(&self, field: PopoverField, criteria: &ResultCriteria) -> Line<'static> {
        let focused = self.focus == Some(field);
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            theme::key_hint_key()
        } else {
            theme::key_hint()
        };

        if field == PopoverField::Clear {
            let style = if focused {
                theme::table_selected()
            } else {
                theme::table_row()
            };
            return Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled("[ Clear ]", style),
            ]);
        }

        let mut spans = vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<10}", field.label()), label_style),
        ];
        match field {
            PopoverField::Mode => spans.push(Span::styled(
                format!("‹ {} ›", criteria.mode),
                theme::table_row(),
            )),
            PopoverField::Priority => spans.push(priority_span(criteria.priority)),
            _ => {
                if let Some(input) = self.input(field) {
                    spans.extend(input_spans(input, focused, placeholder(field)));
                }
                if self.is_invalid(field) {
                    spans.push(Span::styled("  invalid", theme::field_error()));
                }
            }
        }
        Line::from(spans)
    }
}

fn placeholder(field: PopoverField) -> &'static str {
    match field {
        PopoverField::Search => "ID, code, root cause...",
        PopoverField::From | PopoverField::To => "YYYY-MM-DD HH:MM",
        _ => "-",
    }
}

fn priority_span(priority: PriorityFilter) -> Span<'static> {
    match priority {
        PriorityFilter::All => Span::styled("‹ ALL ›", theme::table_row()),
        PriorityFilter::Only(p) => {
            let (label, style) = theme::priority_badge(p);
            Span::styled(format!("‹ {label} ›"), style)
        }
    }
}

/// Text with a block cursor when focused.
fn input_spans(input: &Input, focused: bool, placeholder: &'static str) -> Vec<Span<'static>> {
    let value = input.value();
    if value.is_empty() && !focused {
        return vec![Span::styled(placeholder, theme::muted())];
    }
    if !focused {
        return vec![Span::styled(value.to_owned(), theme::table_row())];
    }
    let before: String = value.chars().take(input.cursor()).collect();
    let rest: String = value.chars().skip(input.cursor()).collect();
    let mut rest_chars = rest.chars();
    let under = rest_chars.next().map_or_else(|| " ".to_owned(), String::from);
    vec![
        Span::styled(before, theme::table_row()),
        Span::styled(under, theme::table_selected()),
        Span::styled(rest_chars.collect::<String>(), theme::table_row()),
    ]
}

fn text_request(key: KeyEvent, numeric: bool) -> Option<InputRequest> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('u') => Some(InputRequest::DeleteLine),
            KeyCode::Char('w') => Some(InputRequest::DeletePrevWord),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char(c) if numeric && !c.is_ascii_digit() => None,
        KeyCode::Char(c) => Some(InputRequest::InsertChar(c)),
        KeyCode::Backspace => Some(InputRequest::DeletePrevChar),
        KeyCode::Delete => Some(InputRequest::DeleteNextChar),
        KeyCode::Left => Some(InputRequest::GoToPrevChar),
        KeyCode::Right => Some(InputRequest::GoToNextChar),
        KeyCode::Home => Some(InputRequest::GoToStart),
        KeyCode::End => Some(InputRequest::GoToEnd),
        _ => None,
    }
}
