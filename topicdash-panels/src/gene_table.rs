//! The paginated gene table.
//!
//! A panel owns its `GeneTableSelection` and nothing else mutable. The four
//! event handlers are total: invalid input leaves the selection untouched.
//! Only `render_page` can fail, and only for the page it was asked to render.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use topicdash_core::{ExpressionLookup, OrdinalLabel, ScoreKey, Sign};

use crate::config::TableOptions;
use crate::error::PanelError;
use crate::events::SelectionEvent;
use crate::mini_plot::MiniPlot;
use crate::scope::ScopeStrategy;
use crate::selection::{self, GeneTableSelection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// Zero-based rank within the signed list.
    pub rank: usize,
    pub gene: String,
    pub score: f64,
    /// `score` to two decimals.
    pub score_label: String,
    /// The unfiltered series first, then the tissue-filtered one if the
    /// panel is tissue-scoped.
    pub charts: Vec<MiniPlot>,
}

/// One rendered page plus the state needed to enable paging controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub score_name: String,
    pub key: ScoreKey,
    pub sign: Sign,
    pub page_start: usize,
    pub page_size: usize,
    /// Length of the signed list.
    pub total: usize,
    pub can_page_back: bool,
    pub can_page_forward: bool,
    pub rows: Vec<TableRow>,
}

impl TableView {
    /// Column headers in display order.
    pub fn header(&self) -> [&str; 4] {
        ["rank", "gene", self.score_name.as_str(), "cpm"]
    }
}

#[derive(Debug)]
pub struct GeneTablePanel {
    scope: Box<dyn ScopeStrategy>,
    expression: Arc<ExpressionLookup>,
    axis: Vec<OrdinalLabel>,
    selection: GeneTableSelection,
    default_key: ScoreKey,
    page_size: usize,
    score_name: String,
}

impl GeneTablePanel {
    /// Build a panel already initialized to its default key.
    pub fn new(
        scope: Box<dyn ScopeStrategy>,
        expression: Arc<ExpressionLookup>,
        options: &TableOptions,
    ) -> Result<Self, PanelError> {
        if options.page_size == 0 {
            return Err(PanelError::ZeroPageSize);
        }
        let default_key = scope
            .default_key(options.default_topic.as_deref())
            .ok_or(PanelError::EmptyScores(scope.label()))?;
        let axis = expression.timepoints();

        debug!(scope = scope.label(), key = %default_key, "gene table created");

        Ok(Self {
            scope,
            expression,
            axis,
            selection: GeneTableSelection::new(default_key.clone()),
            default_key,
            page_size: options.page_size,
            score_name: options.score_name.clone(),
        })
    }

    /// Select `key`, positive sign, first page. Fails for keys outside this
    /// panel's scope.
    pub fn initialize(&mut self, key: ScoreKey) -> Result<(), PanelError> {
        if !self.scope.contains_key(&key) {
            return Err(PanelError::ForeignKey(key));
        }
        self.selection = GeneTableSelection::new(key);
        Ok(())
    }

    /// Back to the startup selection.
    pub fn reset(&mut self) {
        self.selection = GeneTableSelection::new(self.default_key.clone());
    }

    /// Switch to `key` and rewind to the first page, keeping the sign.
    /// Unknown keys are ignored. Returns whether the selection was applied.
    pub fn select_key(&mut self, key: ScoreKey) -> bool {
        if !self.scope.contains_key(&key) {
            debug!(scope = self.scope.label(), key = %key, "selection ignored: unknown key");
            return false;
        }
        debug!(scope = self.scope.label(), key = %key, "selection changed");
        self.selection.key = key;
        self.selection.page_start = 0;
        true
    }

    pub fn on_selection_changed(&mut self, event: &SelectionEvent) -> bool {
        match self.scope.key_for_event(event) {
            Some(key) => self.select_key(key),
            None => {
                debug!(scope = self.scope.label(), event = %event, "selection ignored: arity");
                false
            }
        }
    }

    pub fn on_sign_changed(&mut self, sign: Sign) {
        self.selection.sign = sign;
        self.selection.page_start = 0;
    }

    pub fn toggle_sign(&mut self) {
        self.on_sign_changed(self.selection.sign.toggled());
    }

    /// Returns whether the page moved.
    pub fn on_page_forward(&mut self) -> bool {
        let next = selection::page_forward(self.selection.page_start, self.len(), self.page_size);
        self.move_to(next)
    }

    /// Returns whether the page moved.
    pub fn on_page_back(&mut self) -> bool {
        let prev = selection::page_back(self.selection.page_start, self.len(), self.page_size);
        self.move_to(prev)
    }

    fn move_to(&mut self, page_start: usize) -> bool {
        let moved = page_start != self.selection.page_start;
        self.selection.page_start = page_start;
        moved
    }

    /// Length of the currently selected signed list.
    pub fn len(&self) -> usize {
        self.scope
            .ranked_list(&self.selection.key, self.selection.sign)
            .map(|l| l.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn render_page(&self) -> Result<TableView, PanelError> {
        let sel = &self.selection;
        let list = self.scope.ranked_list(&sel.key, sel.sign)?;
        let total = list.len();
        let tissue = self.scope.tissue_filter(&sel.key);

        let mut rows = Vec::with_capacity(self.page_size.min(total));
        for (offset, record) in list.window(sel.page_start, self.page_size).iter().enumerate() {
            let mut charts = vec![MiniPlot::from_series(
                &self.expression.series_for(&record.gene, None)?,
                &self.axis,
            )];
            if let Some(tissue) = tissue {
                charts.push(MiniPlot::from_series(
                    &self.expression.series_for(&record.gene, Some(tissue))?,
                    &self.axis,
                ));
            }
            rows.push(TableRow {
                rank: sel.page_start + offset,
                gene: record.gene.clone(),
                score: record.score,
                score_label: format!("{:.2}", record.score),
                charts,
            });
        }

        Ok(TableView {
            title: self.scope.title(&sel.key),
            score_name: self.score_name.clone(),
            key: sel.key.clone(),
            sign: sel.sign,
            page_start: sel.page_start,
            page_size: self.page_size,
            total,
            can_page_back: sel.page_start > 0,
            can_page_forward: sel.page_start < selection::max_page_start(total, self.page_size),
            rows,
        })
    }

    pub fn selection(&self) -> &GeneTableSelection {
        &self.selection
    }

    pub fn default_key(&self) -> &ScoreKey {
        &self.default_key
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn scope_label(&self) -> &'static str {
        self.scope.label()
    }

    pub fn keys(&self) -> &[ScoreKey] {
        self.scope.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::{GlobalScope, TissueScope};
    use topicdash_core::{ScoreScope, ScoreStore};

    const GCT: &str = "#1.2\n2\t2\nName\tDescription\tliver_d1_m1\tlung_d1_m1\nA\tna\t1\t2\nB\tna\t3\t4\n";

    fn expression() -> Arc<ExpressionLookup> {
        Arc::new(ExpressionLookup::from_gct(GCT.as_bytes(), "cpm").unwrap())
    }

    fn global_panel() -> GeneTablePanel {
        let csv = "gene,k1,k2\nA,1.0,-2.0\nB,3.0,0.0\n";
        let store = ScoreStore::from_reader(csv.as_bytes(), "g", ScoreScope::Global).unwrap();
        let scope = GlobalScope::new(Arc::new(store)).unwrap();
        GeneTablePanel::new(Box::new(scope), expression(), &TableOptions::default()).unwrap()
    }

    #[test]
    fn new_starts_at_default_topic() {
        let panel = global_panel();
        assert_eq!(panel.selection().key, ScoreKey::global("k1"));
        assert_eq!(panel.selection().sign, Sign::Positive);
        assert_eq!(panel.selection().page_start, 0);
    }

    #[test]
    fn zero_page_size_rejected() {
        let csv = "gene,k1\nA,1.0\n";
        let store = ScoreStore::from_reader(csv.as_bytes(), "g", ScoreScope::Global).unwrap();
        let scope = GlobalScope::new(Arc::new(store)).unwrap();
        let opts = TableOptions {
            page_size: 0,
            ..TableOptions::default()
        };
        let err = GeneTablePanel::new(Box::new(scope), expression(), &opts).unwrap_err();
        assert!(matches!(err, PanelError::ZeroPageSize));
    }

    #[test]
    fn initialize_rejects_foreign_key() {
        let mut panel = global_panel();
        let err = panel.initialize(ScoreKey::tissue("liver", "k1")).unwrap_err();
        assert!(matches!(err, PanelError::ForeignKey(_)));
        panel.initialize(ScoreKey::global("k2")).unwrap();
        assert_eq!(panel.selection().key.topic, "k2");
    }

    #[test]
    fn selection_change_keeps_sign() {
        let mut panel = global_panel();
        panel.on_sign_changed(Sign::Negative);
        assert!(panel.select_key(ScoreKey::global("k2")));
        assert_eq!(panel.selection().sign, Sign::Negative);
        assert_eq!(panel.render_page().unwrap().rows[0].gene, "A");
    }

    #[test]
    fn rows_carry_formatted_score_and_chart() {
        let view = global_panel().render_page().unwrap();
        assert_eq!(view.title, "Genes Correlated with k1");
        assert_eq!(view.header(), ["rank", "gene", "Z", "cpm"]);
        assert_eq!(view.rows[0].gene, "B");
        assert_eq!(view.rows[0].score_label, "3.00");
        assert_eq!(view.rows[0].charts.len(), 1);
        assert_eq!(view.rows[1].rank, 1);
    }

    #[test]
    fn tissue_rows_carry_second_chart() {
        let csv = "organ,gene,k1\nliver,A,2.0\nliver,B,1.0\n";
        let store = ScoreStore::from_reader(csv.as_bytes(), "t", ScoreScope::TissueScoped).unwrap();
        let scope = TissueScope::new(Arc::new(store)).unwrap();
        let panel =
            GeneTablePanel::new(Box::new(scope), expression(), &TableOptions::default()).unwrap();

        let view = panel.render_page().unwrap();
        assert_eq!(view.title, "Genes Correlated with k1 in liver");
        let charts = &view.rows[0].charts;
        assert_eq!(charts.len(), 2);
        assert_eq!(charts[0].lines.len(), 2);
        assert_eq!(charts[1].tissue_filter.as_deref(), Some("liver"));
        assert_eq!(charts[1].lines.len(), 1);
    }
}
