//! Application state: single-owner, main-thread only.
//!
//! Every key press is one synchronous transition on the shell followed by a
//! re-render into `view`, which is what the UI draws from.

use std::collections::VecDeque;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use topicdash_core::OrdinalLabel;
use topicdash_panels::{ChartElement, DashboardShell, DashboardView, PanelError};

pub const ERROR_HISTORY_CAP: usize = 50;

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Timecourse,
    Table(usize),
}

impl Focus {
    pub fn next(self, tables: usize) -> Focus {
        match self {
            Focus::Timecourse if tables > 0 => Focus::Table(0),
            Focus::Table(i) if i + 1 < tables => Focus::Table(i + 1),
            _ => Focus::Timecourse,
        }
    }

    pub fn prev(self, tables: usize) -> Focus {
        match self {
            Focus::Timecourse if tables > 0 => Focus::Table(tables - 1),
            Focus::Table(i) if i > 0 => Focus::Table(i - 1),
            _ => Focus::Timecourse,
        }
    }
}

/// Highlighted bar segment, as indices into the current timecourse view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChartCursor {
    pub facet: usize,
    pub timepoint: usize,
    pub topic: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Panel,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Panel => "PANEL",
        }
    }

    fn of(err: &PanelError) -> Self {
        match err {
            PanelError::Data(_) => ErrorCategory::Data,
            _ => ErrorCategory::Panel,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

pub struct AppState {
    pub shell: DashboardShell,
    pub view: DashboardView,
    /// Sorted tissue names, for the tissue color key.
    pub tissues: Vec<String>,

    pub focus: Focus,
    pub cursor: ChartCursor,
    pub running: bool,

    pub overlay: Overlay,
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
}

impl AppState {
    /// Takes ownership of a composed shell and performs the initial render.
    pub fn new(shell: DashboardShell, tissues: Vec<String>) -> Self {
        let view = shell.start();
        let mut app = Self {
            shell,
            view,
            tissues,
            focus: Focus::Timecourse,
            cursor: ChartCursor::default(),
            running: true,
            overlay: Overlay::None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
        };
        let failures: Vec<(usize, String)> = app
            .view
            .tables
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().err().map(|e| (i, e.to_string())))
            .collect();
        for (i, message) in failures {
            app.push_error(ErrorCategory::Data, message, format!("table {} initial render", i + 1));
        }
        app
    }

    /// Push an error to the history, capping at `ERROR_HISTORY_CAP`.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        warn!(category = category.label(), %message, %context, "ui error");
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    /// Re-render after a transition. Tables whose render newly fails (or
    /// fails differently) are added to the error history.
    pub fn refresh(&mut self) {
        let previous: Vec<Option<String>> = self
            .view
            .tables
            .iter()
            .map(|t| t.as_ref().err().map(|e| e.to_string()))
            .collect();
        self.view = self.shell.render();
        self.clamp_cursor();

        let fresh: Vec<(usize, ErrorCategory, String)> = self
            .view
            .tables
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_ref().err().map(|e| (i, ErrorCategory::of(e), e.to_string())))
            .filter(|(i, _, msg)| previous.get(*i).and_then(|p| p.as_deref()) != Some(msg.as_str()))
            .collect();
        for (i, category, message) in fresh {
            self.push_error(category, message, format!("table {}", i + 1));
        }
    }

    // ── Timecourse ──────────────────────────────────────────────────

    fn clamp_cursor(&mut self) {
        let tc = &self.view.timecourse;
        self.cursor.facet = self.cursor.facet.min(tc.facets.len().saturating_sub(1));
        self.cursor.timepoint = self.cursor.timepoint.min(tc.timepoints.len().saturating_sub(1));
        self.cursor.topic = self.cursor.topic.min(tc.topics.len().saturating_sub(1));
    }

    pub fn move_facet(&mut self, delta: isize) {
        let n = self.view.timecourse.facets.len();
        self.cursor.facet = step(self.cursor.facet, delta, n);
    }

    pub fn move_timepoint(&mut self, delta: isize) {
        let n = self.view.timecourse.timepoints.len();
        self.cursor.timepoint = step(self.cursor.timepoint, delta, n);
    }

    pub fn move_topic(&mut self, delta: isize) {
        let n = self.view.timecourse.topics.len();
        self.cursor.topic = step(self.cursor.topic, delta, n);
    }

    /// The bar segment under the cursor.
    pub fn selected_element(&self) -> Option<ChartElement> {
        let tc = &self.view.timecourse;
        let facet = tc.facets.get(self.cursor.facet)?;
        let timepoint: &OrdinalLabel = tc.timepoints.get(self.cursor.timepoint)?;
        let topic: &OrdinalLabel = tc.topics.get(self.cursor.topic)?;
        Some(ChartElement {
            tissue: facet.tissue.clone(),
            timepoint: timepoint.clone(),
            topic: topic.clone(),
        })
    }

    pub fn activate_cursor(&mut self) {
        let Some(element) = self.selected_element() else {
            self.set_warning("Nothing to select");
            return;
        };
        match self.shell.activate(&element) {
            Some(event) => {
                info!(event = %event, "chart element activated");
                self.set_status(format!("Selected {event}"));
            }
            None => self.set_warning("Segment is not selectable"),
        }
        self.refresh();
    }

    pub fn toggle_encoding(&mut self) {
        let encoding = self.shell.timecourse_mut().toggle_encoding();
        self.set_status(format!("Timecourse encoding: {encoding:?}"));
        self.refresh();
    }

    // ── Tables ──────────────────────────────────────────────────────

    pub fn page_forward(&mut self, table: usize) {
        let result = self.shell.page_forward(table);
        self.after_table_action(table, result.map(|moved| (!moved).then_some("Already on the last page")));
    }

    pub fn page_back(&mut self, table: usize) {
        let result = self.shell.page_back(table);
        self.after_table_action(table, result.map(|moved| (!moved).then_some("Already on the first page")));
    }

    pub fn toggle_sign(&mut self, table: usize) {
        let result = self.shell.toggle_sign(table);
        self.after_table_action(table, result.map(|_| None));
    }

    pub fn reset_table(&mut self, table: usize) {
        let result = self.shell.reset_table(table);
        self.after_table_action(table, result.map(|_| None));
    }

    fn after_table_action(&mut self, table: usize, result: Result<Option<&'static str>, PanelError>) {
        match result {
            Ok(Some(note)) => self.set_warning(note),
            Ok(None) => {}
            Err(err) => self.push_error(
                ErrorCategory::of(&err),
                err.to_string(),
                format!("table {}", table + 1),
            ),
        }
        self.refresh();
    }
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    current.saturating_add_signed(delta).min(len - 1)
}
