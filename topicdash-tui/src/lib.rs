//! topicdash TUI: terminal dashboard over a loaded topic dataset.
//!
//! Layout:
//! - Left: faceted stacked-bar timecourse of topic weights (keyboard cursor)
//! - Right: color key, then one gene table per scope with expression sparklines
//! - Bottom: key hints and the last status message

pub mod app;
pub mod args;
pub mod input;
pub mod logging;
pub mod sample_data;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use args::Args;

#[cfg(test)]
mod test_helpers;
