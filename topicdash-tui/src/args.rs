//! Command-line flags. Every flag overrides the matching config entry.

use std::path::PathBuf;

use clap::Parser;

use topicdash_panels::DashboardConfig;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "topicdash-tui", version, about = "Topic timecourse dashboard")]
pub struct Args {
    /// TOML config file (default: <config_dir>/topicdash/config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-sample topic weights (CSV)
    #[arg(long)]
    pub topics: Option<PathBuf>,

    /// Expression matrix (GCT)
    #[arg(long)]
    pub cpm: Option<PathBuf>,

    /// Global gene/topic scores (CSV)
    #[arg(long = "global-z")]
    pub global_scores: Option<PathBuf>,

    /// Tissue-scoped gene/topic scores (CSV)
    #[arg(long = "tissue-z")]
    pub tissue_scores: Option<PathBuf>,

    /// Genes per table page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Score column header
    #[arg(long)]
    pub score_name: Option<String>,

    /// Topic selected at startup
    #[arg(long)]
    pub default_topic: Option<String>,

    /// Log file (default: <data_dir>/topicdash/topicdash.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run on the built-in demo dataset instead of input files
    #[arg(long)]
    pub demo: bool,
}

impl Args {
    /// Layer these flags over `config`.
    pub fn apply(&self, mut config: DashboardConfig) -> DashboardConfig {
        let inputs = &mut config.inputs;
        if let Some(p) = &self.topics {
            inputs.topics = Some(p.clone());
        }
        if let Some(p) = &self.cpm {
            inputs.cpm = Some(p.clone());
        }
        if let Some(p) = &self.global_scores {
            inputs.global_scores = Some(p.clone());
        }
        if let Some(p) = &self.tissue_scores {
            inputs.tissue_scores = Some(p.clone());
        }
        if let Some(n) = self.page_size {
            config.table.page_size = n;
        }
        if let Some(name) = &self.score_name {
            config.table.score_name = name.clone();
        }
        if let Some(topic) = &self.default_topic {
            config.table.default_topic = Some(topic.clone());
        }
        config
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("topicdash")
                .join("topicdash.log")
        })
    }
}
