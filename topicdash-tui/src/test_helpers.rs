//! Test helpers: an app over the built-in demo dataset.

use topicdash_panels::{DashboardShell, TableOptions};

use crate::app::AppState;
use crate::sample_data::sample_dataset;

pub fn sample_app() -> AppState {
    let dataset = sample_dataset().unwrap();
    let tissues = dataset.timecourse.tissues().to_vec();
    let shell = DashboardShell::from_dataset(&dataset, &TableOptions::default()).unwrap();
    AppState::new(shell, tissues)
}
