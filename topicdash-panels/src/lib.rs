//! topicdash panels: the interactive layer over the loaded tables.
//!
//! - `GeneTablePanel` with a pluggable `ScopeStrategy` (global or per tissue)
//! - `TimecoursePanel` firing typed `SelectionEvent`s to its subscribers
//! - `DashboardShell` wiring one timecourse to any number of tables
//! - `DashboardConfig` loaded from TOML
//!
//! Everything here is single-threaded: each user action is one synchronous
//! transition followed by a re-render.

pub mod config;
pub mod error;
pub mod events;
pub mod gene_table;
pub mod mini_plot;
pub mod scope;
pub mod selection;
pub mod shell;
pub mod timecourse;

pub use config::{ConfigError, DashboardConfig, InputPaths, TableOptions};
pub use error::PanelError;
pub use events::{EventSource, SelectionEvent, SubscriptionId};
pub use gene_table::{GeneTablePanel, TableRow, TableView};
pub use mini_plot::{MiniPlot, PlotLine, PlotPoint};
pub use scope::{GlobalScope, ScopeStrategy, TissueScope};
pub use selection::GeneTableSelection;
pub use shell::{DashboardShell, DashboardView, ShellState};
pub use timecourse::{
    ChartElement, ChartEncoding, Facet, StackColumn, StackSegment, TimecoursePanel, TimecourseView,
};
