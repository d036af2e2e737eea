//! Chart model for the per-gene expression mini-plots.

use serde::Serialize;

use topicdash_core::{ExpressionSeries, OrdinalLabel};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub timepoint: OrdinalLabel,
    /// Position of `timepoint` on the shared x axis.
    pub x: f64,
    pub value: f64,
}

/// One tissue's line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotLine {
    pub tissue: String,
    pub points: Vec<PlotPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiniPlot {
    pub gene: String,
    pub tissue_filter: Option<String>,
    pub lines: Vec<PlotLine>,
}

impl MiniPlot {
    /// Lay a series out against `axis`, the ordinal timepoints every plot in
    /// the dashboard shares. Timepoints missing from `axis` are dropped.
    pub fn from_series(series: &ExpressionSeries, axis: &[OrdinalLabel]) -> Self {
        let lines = series
            .tissues()
            .into_iter()
            .map(|tissue| PlotLine {
                tissue: tissue.to_string(),
                points: series
                    .sub_series(tissue)
                    .filter_map(|p| {
                        let x = axis.iter().position(|t| *t == p.timepoint)?;
                        Some(PlotPoint {
                            timepoint: p.timepoint.clone(),
                            x: x as f64,
                            value: p.value,
                        })
                    })
                    .collect(),
            })
            .collect();

        Self {
            gene: series.gene.clone(),
            tissue_filter: series.tissue_filter.clone(),
            lines,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.points.is_empty())
    }

    /// `(min, max)` over every value, widened when flat. `None` when empty.
    pub fn y_bounds(&self) -> Option<(f64, f64)> {
        let mut values = self.lines.iter().flat_map(|l| l.points.iter().map(|p| p.value));
        let first = values.next()?;
        let (lo, hi) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if (hi - lo).abs() < f64::EPSILON {
            Some((lo - 1.0, hi + 1.0))
        } else {
            Some((lo, hi))
        }
    }
}
