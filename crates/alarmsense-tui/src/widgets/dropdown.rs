//! Single-select dropdown.
//!
//! Closed, it shows the selected label (or a placeholder). Enter or Down
//! opens the menu with the current selection highlighted. Up/Down move the
//! highlight without wrapping, Enter commits, Esc closes without a change.
//! A disabled dropdown carries the reason and ignores every key.

use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// What a key press did to the dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropdownOutcome {
    /// Not for us; let the form handle it.
    Ignored,
    /// Consumed without changing the selection.
    Consumed,
    /// The user picked this value.
    Committed(String),
}

#[derive(Debug, Clone, Default)]
pub struct Dropdown {
    label: &'static str,
    placeholder: &'static str,
    options: Vec<DropdownOption>,
    open: bool,
    highlight: usize,
    disabled: Option<String>,
}

impl Dropdown {
    pub fn new(label: &'static str, placeholder: &'static str) -> Self {
        Self {
            label,
            placeholder,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &[DropdownOption] {
        &self.options
    }

    pub fn set_options(&mut self, options: Vec<DropdownOption>) {
        self.options = options;
        self.highlight = self.highlight.min(self.options.len().saturating_sub(1));
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Disable with a hint, or re-enable with `None`. Disabling closes.
    pub fn set_disabled(&mut self, reason: Option<String>) {
        if reason.is_some() {
            self.open = false;
        }
        self.disabled = reason;
    }

    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled.as_deref()
    }

    /// Open with the highlight on `selected`, or on the first option.
    pub fn open(&mut self, selected: &str) {
        if self.disabled.is_some() {
            return;
        }
        self.highlight = self
            .options
            .iter()
            .position(|o| o.value == selected)
            .unwrap_or(0);
        self.open = true;
    }

    /// Also called when focus leaves the field.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn handle_key(&mut self, code: KeyCode, selected: &str) -> DropdownOutcome {
        if self.disabled.is_some() {
            return DropdownOutcome::Ignored;
        }
        if !self.open {
            return match code {
                KeyCode::Enter | KeyCode::Down | KeyCode::Char(' ') => {
                    self.open(selected);
                    DropdownOutcome::Consumed
                }
                _ => DropdownOutcome::Ignored,
            };
        }
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.highlight = self.highlight.saturating_sub(1);
                DropdownOutcome::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.highlight + 1 < self.options.len() {
                    self.highlight += 1;
                }
                DropdownOutcome::Consumed
            }
            KeyCode::Enter => {
                self.open = false;
                match self.options.get(self.highlight) {
                    Some(option) => DropdownOutcome::Committed(option.value.clone()),
                    None => DropdownOutcome::Consumed,
                }
            }
            KeyCode::Esc | KeyCode::Tab | KeyCode::BackTab => {
                self.open = false;
                DropdownOutcome::Consumed
            }
            _ => DropdownOutcome::Consumed,
        }
    }

    fn selected_label(&self, selected: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == selected)
            .map(|o| o.label.as_str())
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// The closed field: bordered box, selection or placeholder, and the
    /// error or disabled hint in the bottom border.
    pub fn render_field(
        &self,
        frame: &mut Frame,
        area: Rect,
        selected: &str,
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
        } else if let Some(reason) = self.disabled_reason() {
            block = block.title_bottom(Span::styled(format!(" {reason} "), theme::muted()));
        }

        let arrow = if self.open { "▴" } else { "▾" };
        let body = match self.selected_label(selected) {
            Some(label) => Span::styled(label.to_owned(), theme::table_row()),
            None => Span::styled(self.placeholder, theme::muted()),
        };
        let line = Line::from(vec![
            body,
            Span::raw(" "),
            Span::styled(arrow, theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    /// The open menu, drawn over whatever sits below `anchor`.
    pub fn render_menu(&self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.open {
            return;
        }
        let rows = u16::try_from(self.options.len().max(1)).unwrap_or(u16::MAX);
        let height = rows
            .saturating_add(2)
            .min(bounds.bottom().saturating_sub(anchor.bottom()));
        if height < 3 {
            return;
        }
        let area = Rect::new(anchor.x, anchor.bottom(), anchor.width, height);
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(ratatui::style::Style::default().bg(theme::BG_DARK));

        if self.options.is_empty() {
            let empty = Paragraph::new(Span::styled("No options", theme::muted())).block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|o| ListItem::new(o.label.clone()).style(theme::table_row()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::table_selected())
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(self.highlight));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sites() -> Dropdown {
        let mut d = Dropdown::new("Site", "Select site");
        d.set_options(vec![
            DropdownOption::new("S1", "North Ridge"),
            DropdownOption::new("S2", "Coastal Array"),
            DropdownOption::new("S3", "Highland Plateau"),
        ]);
        d
    }

    #[test]
    fn enter_opens_on_current_selection() {
        let mut d = sites();
        assert_eq!(d.handle_key(KeyCode::Enter, "S2"), DropdownOutcome::Consumed);
        assert!(d.is_open());
        assert_eq!(d.highlight, 1);
    }

    #[test]
    fn down_opens_then_moves_and_clamps() {
        let mut d = sites();
        d.handle_key(KeyCode::Down, "");
        assert_eq!(d.highlight, 0);
        for _ in 0..5 {
            d.handle_key(KeyCode::Down, "");
        }
        assert_eq!(d.highlight, 2);
        for _ in 0..5 {
            d.handle_key(KeyCode::Up, "");
        }
        assert_eq!(d.highlight, 0);
    }

    #[test]
    fn enter_commits_highlight() {
        let mut d = sites();
        d.handle_key(KeyCode::Enter, "");
        d.handle_key(KeyCode::Down, "");
        assert_eq!(
            d.handle_key(KeyCode::Enter, ""),
            DropdownOutcome::Committed("S2".into())
        );
        assert!(!d.is_open());
    }

    #[test]
    fn escape_closes_without_commit() {
        let mut d = sites();
        d.handle_key(KeyCode::Enter, "S1");
        d.handle_key(KeyCode::Down, "S1");
        assert_eq!(d.handle_key(KeyCode::Esc, "S1"), DropdownOutcome::Consumed);
        assert!(!d.is_open());
    }

    #[test]
    fn disabled_ignores_keys_and_keeps_reason() {
        let mut d = sites();
        d.set_disabled(Some("Select a site first".into()));
        assert_eq!(d.handle_key(KeyCode::Enter, ""), DropdownOutcome::Ignored);
        assert!(!d.is_open());
        assert_eq!(d.disabled_reason(), Some("Select a site first"));
    }

    #[test]
    fn empty_menu_commits_nothing() {
        let mut d = Dropdown::new("Turbine", "Select turbine");
        d.handle_key(KeyCode::Enter, "");
        assert!(d.is_open());
        assert_eq!(d.handle_key(KeyCode::Enter, ""), DropdownOutcome::Consumed);
    }

    #[test]
    fn shrinking_options_clamps_highlight() {
        let mut d = sites();
        d.open("S3");
        d.set_options(vec![DropdownOption::new("S1", "North Ridge")]);
        assert_eq!(d.highlight, 0);
    }
}
