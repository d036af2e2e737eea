//! Dashboard composition: one timecourse, N gene tables, and the wiring
//! between them. The shell holds no state of its own beyond that wiring.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, info};

use topicdash_core::{Dataset, Sign};

use crate::config::TableOptions;
use crate::error::PanelError;
use crate::events::SelectionEvent;
use crate::gene_table::{GeneTablePanel, TableView};
use crate::scope::{GlobalScope, TissueScope};
use crate::selection::GeneTableSelection;
use crate::timecourse::{ChartElement, TimecoursePanel, TimecourseView};

/// Everything needed to draw one frame. Table renders fail independently.
#[derive(Debug)]
pub struct DashboardView {
    pub timecourse: TimecourseView,
    pub tables: Vec<Result<TableView, PanelError>>,
}

/// Serializable snapshot of every table's selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShellState {
    pub selections: Vec<GeneTableSelection>,
}

#[derive(Debug)]
pub struct DashboardShell {
    timecourse: TimecoursePanel,
    tables: Vec<Rc<RefCell<GeneTablePanel>>>,
}

impl DashboardShell {
    /// Subscribe every table to the timecourse's `selection_changed`.
    pub fn compose(mut timecourse: TimecoursePanel, tables: Vec<GeneTablePanel>) -> Self {
        let tables: Vec<_> = tables.into_iter().map(|t| Rc::new(RefCell::new(t))).collect();
        for table in &tables {
            let table = Rc::clone(table);
            timecourse.subscribe(move |event: &SelectionEvent| {
                table.borrow_mut().on_selection_changed(event);
            });
        }
        debug!(tables = tables.len(), "dashboard wired");
        Self { timecourse, tables }
    }

    /// The standard layout: a global table, plus a tissue-scoped table when
    /// the dataset has tissue scores.
    pub fn from_dataset(dataset: &Dataset, options: &TableOptions) -> Result<Self, PanelError> {
        let mut tables = vec![GeneTablePanel::new(
            Box::new(GlobalScope::new(dataset.global_scores.clone())?),
            dataset.expression.clone(),
            options,
        )?];
        if let Some(store) = &dataset.tissue_scores {
            tables.push(GeneTablePanel::new(
                Box::new(TissueScope::new(store.clone())?),
                dataset.expression.clone(),
                options,
            )?);
        }
        Ok(Self::compose(
            TimecoursePanel::new(dataset.timecourse.clone()),
            tables,
        ))
    }

    /// Initial render: every table back to its default selection, then one
    /// render pass so the first frame is complete.
    pub fn start(&self) -> DashboardView {
        for table in &self.tables {
            table.borrow_mut().reset();
        }
        let view = self.render();
        let failed = view.tables.iter().filter(|t| t.is_err()).count();
        info!(tables = self.tables.len(), failed, "dashboard started");
        view
    }

    pub fn activate(&mut self, element: &ChartElement) -> Option<SelectionEvent> {
        self.timecourse.activate(element)
    }

    pub fn page_forward(&self, table: usize) -> Result<bool, PanelError> {
        Ok(self.table(table)?.borrow_mut().on_page_forward())
    }

    pub fn page_back(&self, table: usize) -> Result<bool, PanelError> {
        Ok(self.table(table)?.borrow_mut().on_page_back())
    }

    pub fn set_sign(&self, table: usize, sign: Sign) -> Result<(), PanelError> {
        self.table(table)?.borrow_mut().on_sign_changed(sign);
        Ok(())
    }

    pub fn toggle_sign(&self, table: usize) -> Result<Sign, PanelError> {
        let mut panel = self.table(table)?.borrow_mut();
        panel.toggle_sign();
        Ok(panel.selection().sign)
    }

    pub fn reset_table(&self, table: usize) -> Result<(), PanelError> {
        self.table(table)?.borrow_mut().reset();
        Ok(())
    }

    pub fn render(&self) -> DashboardView {
        DashboardView {
            timecourse: self.timecourse.view(),
            tables: self.tables.iter().map(|t| t.borrow().render_page()).collect(),
        }
    }

    pub fn render_table(&self, table: usize) -> Result<TableView, PanelError> {
        self.table(table)?.borrow().render_page()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn state(&self) -> ShellState {
        ShellState {
            selections: self
                .tables
                .iter()
                .map(|t| t.borrow().selection().clone())
                .collect(),
        }
    }

    pub fn timecourse(&self) -> &TimecoursePanel {
        &self.timecourse
    }

    pub fn timecourse_mut(&mut self) -> &mut TimecoursePanel {
        &mut self.timecourse
    }

    fn table(&self, table: usize) -> Result<&Rc<RefCell<GeneTablePanel>>, PanelError> {
        self.tables.get(table).ok_or(PanelError::NoSuchTable(table))
    }
}
