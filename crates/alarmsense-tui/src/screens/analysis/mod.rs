//! Root-cause analysis screen: search form, result table, filter popover
//! and details overlay.
//!
//! The form is a thin shell over [`SearchState`]; validation, the loading
//! flag and stale-response rejection all live there. This module maps keys
//! onto it and turns accepted submits into [`Action::RequestSearch`].

mod popover;
mod render;

use std::path::PathBuf;

use chrono::Utc;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Frame, layout::Rect, widgets::TableState};
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, warn};

use alarmsense_core::{
    EXPORT_FILE_NAME, FilterField, MatchMode, Pager, ResultCriteria, RootCauseResult,
    SearchState, SubmitError, export, filter_results,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::widgets::datetime_picker::{DateTimePicker, PickerOutcome};
use crate::widgets::dropdown::{Dropdown, DropdownOption, DropdownOutcome};

use self::popover::{FilterPopover, PopoverOutcome};

const SELECT_SITE_FIRST: &str = "Select a site first";
const LOADING_SITES: &str = "Loading sites...";
const LOADING_TURBINES: &str = "Loading turbines...";

/// Tab order of the screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormFocus {
    #[default]
    Site,
    Turbine,
    Start,
    End,
    Search,
    Reset,
    Results,
}

impl FormFocus {
    const ORDER: [Self; 7] = [
        Self::Site,
        Self::Turbine,
        Self::Start,
        Self::End,
        Self::Search,
        Self::Reset,
        Self::Results,
    ];

    fn step(self, forward: bool) -> Self {
        let len = Self::ORDER.len();
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        let next = (if forward { idx + 1 } else { idx + len - 1 }) % len;
        Self::ORDER.get(next).copied().unwrap_or_default()
    }
}

pub struct AnalysisScreen {
    search: SearchState,
    site_dropdown: Dropdown,
    turbine_dropdown: Dropdown,
    start_picker: DateTimePicker,
    end_picker: DateTimePicker,
    focus: FormFocus,
    popover: FilterPopover,
    criteria: ResultCriteria,
    /// `search.results()` after `criteria`, in backend order.
    filtered: Vec<RootCauseResult>,
    pager: Pager,
    /// Row within the current page.
    table_state: TableState,
    details_open: bool,
    throbber: ThrobberState,
    export_path: PathBuf,
}

impl AnalysisScreen {
    pub fn new(page_size: usize, match_mode: MatchMode) -> Self {
        let pager = Pager::new(page_size).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring configured page size");
            Pager::default()
        });
        let mut site_dropdown = Dropdown::new("Site", "Select site");
        site_dropdown.set_disabled(Some(LOADING_SITES.into()));
        let mut turbine_dropdown = Dropdown::new("Turbine", "Select turbine");
        turbine_dropdown.set_disabled(Some(SELECT_SITE_FIRST.into()));

        Self {
            search: SearchState::new(),
            site_dropdown,
            turbine_dropdown,
            start_picker: DateTimePicker::new("Start"),
            end_picker: DateTimePicker::new("End"),
            focus: FormFocus::Site,
            popover: FilterPopover::default(),
            criteria: ResultCriteria {
                mode: match_mode,
                ..ResultCriteria::default()
            },
            filtered: Vec::new(),
            pager,
            table_state: TableState::default(),
            details_open: false,
            throbber: ThrobberState::default(),
            export_path: PathBuf::from(EXPORT_FILE_NAME),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.search.is_loading()
    }

    // ── Form ────────────────────────────────────────────────────────

    fn set_focus(&mut self, focus: FormFocus) {
        self.site_dropdown.close();
        self.turbine_dropdown.close();
        self.start_picker.close();
        self.end_picker.close();
        self.focus = focus;
    }

    fn sync_turbine_dropdown(&mut self, loading: bool) {
        let options = self
            .search
            .turbines()
            .iter()
            .map(|t| DropdownOption::new(t.id.clone(), format!("{} ({})", t.name, t.id)))
            .collect();
        self.turbine_dropdown.set_options(options);

        let reason = if self.search.filter().site_id.is_empty() {
            Some(SELECT_SITE_FIRST.into())
        } else if loading {
            Some(LOADING_TURBINES.into())
        } else {
            None
        };
        self.turbine_dropdown.set_disabled(reason);
    }

    fn select_site(&mut self, site_id: String) -> Option<Action> {
        let changed = site_id != self.search.filter().site_id;
        self.search.set_site(site_id.clone());
        if !changed {
            return None;
        }
        let fetch = !site_id.is_empty();
        self.sync_turbine_dropdown(fetch);
        fetch.then_some(Action::RequestTurbines(site_id))
    }

    fn submit(&mut self) -> Option<Action> {
        match self.search.submit() {
            Ok(ticket) => {
                debug!(generation = ticket.generation, "search submitted");
                self.details_open = false;
                Some(Action::RequestSearch(ticket))
            }
            Err(SubmitError::Busy) => Some(Action::Notify(Notification::info(
                "A search is already running",
            ))),
            Err(SubmitError::Invalid(errors)) => {
                debug!(%errors, "search form rejected");
                // Jump to the first field that needs attention.
                if let Some(field) = errors.fields().first() {
                    self.set_focus(match field {
                        FilterField::SiteId => FormFocus::Site,
                        FilterField::TurbineId => FormFocus::Turbine,
                        FilterField::StartDateTime => FormFocus::Start,
                        FilterField::EndDateTime => FormFocus::End,
                    });
                }
                None
            }
        }
    }

    fn reset(&mut self) {
        self.search.reset();
        self.criteria.clear();
        self.popover = FilterPopover::default();
        self.filtered.clear();
        self.pager.set_total(0);
        self.table_state.select(None);
        self.details_open = false;
        self.sync_turbine_dropdown(false);
        self.set_focus(FormFocus::Site);
    }

    // ── Results ─────────────────────────────────────────────────────

    fn apply_criteria(&mut self) {
        self.filtered = filter_results(self.search.results(), &self.criteria);
        self.pager.set_total(self.filtered.len());
        self.select_first_row();
    }

    fn select_first_row(&mut self) {
        let has_rows = !self.pager.slice(&self.filtered).is_empty();
        self.table_state.select(has_rows.then_some(0));
    }

    fn page_rows(&self) -> &[RootCauseResult] {
        self.pager.slice(&self.filtered)
    }

    fn selected_record(&self) -> Option<&RootCauseResult> {
        self.table_state
            .selected()
            .and_then(|i| self.page_rows().get(i))
    }

    fn move_selection(&mut self, down: bool) {
        let rows = self.page_rows().len();
        if rows == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (current + 1).min(rows - 1)
        } else {
            current.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn turn_page(&mut self, turn: fn(&mut Pager)) {
        let before = self.pager.page();
        turn(&mut self.pager);
        if self.pager.page() != before {
            self.select_first_row();
        }
    }

    fn export(&self) -> Action {
        if self.filtered.is_empty() {
            return Action::Notify(Notification::warning("Nothing to export"));
        }
        match export::export_to_path(&self.filtered, &self.export_path) {
            Ok(rows) => Action::Notify(Notification::success(format!(
                "Exported {rows} rows to {}",
                self.export_path.display()
            ))),
            Err(e) => {
                warn!(error = %e, path = %self.export_path.display(), "export failed");
                Action::Notify(Notification::error(format!("Export failed: {e}")))
            }
        }
    }

    // ── Key routing ─────────────────────────────────────────────────

    fn handle_overlay_key(&mut self, key: KeyEvent) -> Option<Option<Action>> {
        if self.details_open {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                self.details_open = false;
            }
            return Some(None);
        }
        if self.popover.is_open() {
            if self.popover.handle_key(key, &mut self.criteria) == PopoverOutcome::Changed {
                self.apply_criteria();
            }
            return Some(None);
        }
        None
    }

    fn handle_field_key(&mut self, key: KeyEvent) -> Option<Option<Action>> {
        let today = Utc::now().date_naive();
        match self.focus {
            FormFocus::Site => {
                let selected = self.search.filter().site_id.clone();
                match self.site_dropdown.handle_key(key.code, &selected) {
                    DropdownOutcome::Ignored => None,
                    DropdownOutcome::Consumed => Some(None),
                    DropdownOutcome::Committed(site) => Some(self.select_site(site)),
                }
            }
            FormFocus::Turbine => {
                let selected = self.search.filter().turbine_id.clone();
                match self.turbine_dropdown.handle_key(key.code, &selected) {
                    DropdownOutcome::Ignored => None,
                    DropdownOutcome::Consumed => Some(None),
                    DropdownOutcome::Committed(turbine) => {
                        self.search.set_turbine(turbine);
                        Some(None)
                    }
                }
            }
            FormFocus::Start | FormFocus::End => {
                let start = self.focus == FormFocus::Start;
                let committed = if start {
                    self.search.filter().start_date_time
                } else {
                    self.search.filter().end_date_time
                };
                let picker = if start {
                    &mut self.start_picker
                } else {
                    &mut self.end_picker
                };
                if !picker.is_open() {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        picker.open(committed, today);
                        return Some(None);
                    }
                    return None;
                }
                match picker.handle_key(key.code) {
                    PickerOutcome::Confirmed(value) if start => self.search.set_start(Some(value)),
                    PickerOutcome::Confirmed(value) => self.search.set_end(Some(value)),
                    PickerOutcome::Ignored => return None,
                    PickerOutcome::Consumed | PickerOutcome::Cancelled => {}
                }
                Some(None)
            }
            FormFocus::Search if key.code == KeyCode::Enter => Some(self.submit()),
            FormFocus::Reset if key.code == KeyCode::Enter => {
                self.reset();
                Some(None)
            }
            FormFocus::Results => self.handle_results_key(key),
            FormFocus::Search | FormFocus::Reset => None,
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) -> Option<Option<Action>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Enter => {
                self.details_open = self.selected_record().is_some();
            }
            KeyCode::Left | KeyCode::Char('h') => self.turn_page(Pager::prev),
            KeyCode::Right | KeyCode::Char('l') => self.turn_page(Pager::next),
            KeyCode::Home | KeyCode::Char('g') => self.turn_page(Pager::first),
            KeyCode::End | KeyCode::Char('G') => self.turn_page(Pager::last),
            _ => return None,
        }
        Some(None)
    }
}

impl Component for AnalysisScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(action) = self.handle_overlay_key(key) {
            return Ok(action);
        }

        let widget_open = self.captures_input();
        match key.code {
            KeyCode::Tab if !widget_open => {
                self.set_focus(self.focus.step(true));
                return Ok(None);
            }
            KeyCode::BackTab if !widget_open => {
                self.set_focus(self.focus.step(false));
                return Ok(None);
            }
            _ => {}
        }

        if let Some(action) = self.handle_field_key(key) {
            return Ok(action);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('R') => {
                self.reset();
                None
            }
            KeyCode::Char('f') => {
                self.popover.open();
                None
            }
            KeyCode::Char('p') => {
                self.pager.cycle_page_size();
                self.select_first_row();
                None
            }
            KeyCode::Char('e') => Some(self.export()),
            KeyCode::PageUp => {
                self.turn_page(Pager::prev);
                None
            }
            KeyCode::PageDown => {
                self.turn_page(Pager::next);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::SitesLoaded(response) => {
                self.site_dropdown.set_disabled(None);
                let options = response
                    .data
                    .iter()
                    .map(|s| DropdownOption::new(s.id.clone(), format!("{} ({})", s.name, s.id)))
                    .collect();
                self.site_dropdown.set_options(options);
                debug!(count = self.site_dropdown.options().len(), "site list applied");
            }
            Action::TurbinesLoaded { site_id, response } => {
                if self.search.turbines_loaded(site_id, response.data.clone()) {
                    self.sync_turbine_dropdown(false);
                } else {
                    debug!(site_id, "dropping turbines for a site no longer selected");
                }
            }
            Action::SearchCompleted {
                generation,
                response,
            } => {
                if !self.search.complete(*generation, response.clone()) {
                    debug!(generation, "dropping stale search response");
                    return Ok(None);
                }
                self.apply_criteria();
                let found = self.search.results().len();
                return Ok(Some(Action::Notify(Notification::info(format!(
                    "{found} root causes found"
                )))));
            }
            Action::Tick if self.search.is_loading() => self.throbber.calc_next(),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        self.render_screen(frame, area);
    }

    fn captures_input(&self) -> bool {
        self.details_open
            || self.popover.is_open()
            || self.site_dropdown.is_open()
            || self.turbine_dropdown.is_open()
            || self.start_picker.is_open()
            || self.end_picker.is_open()
    }

    fn id(&self) -> &str {
        "analysis"
    }
}
