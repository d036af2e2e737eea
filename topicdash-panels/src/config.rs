//! Dashboard configuration.
//!
//! Resolution order is built-in defaults, then a TOML file, then whatever
//! the binaries override from their command line. `validate()` runs last.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use topicdash_core::DatasetPaths;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required input path '{0}'")]
    MissingInput(&'static str),

    #[error("page_size must be at least 1")]
    ZeroPageSize,

    #[error("score_name must not be empty")]
    EmptyScoreName,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub inputs: InputPaths,
    pub table: TableOptions,
}

/// Input table locations. All optional here so a TOML file can name only
/// some of them and leave the rest to the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    pub topics: Option<PathBuf>,
    pub cpm: Option<PathBuf>,
    pub global_scores: Option<PathBuf>,
    pub tissue_scores: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Rows per table page.
    pub page_size: usize,
    /// Header of the score column.
    pub score_name: String,
    /// Topic selected at startup. Falls back to the first loaded topic.
    pub default_topic: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            page_size: 5,
            score_name: "Z".to_string(),
            default_topic: Some("k1".to_string()),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load `explicit` if given, else the per-user config file when it
    /// exists, else the defaults. An explicit path that cannot be read is an
    /// error; a missing per-user file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/topicdash/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("topicdash").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dataset_paths()?;
        if self.table.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.table.score_name.trim().is_empty() {
            return Err(ConfigError::EmptyScoreName);
        }
        Ok(())
    }

    pub fn dataset_paths(&self) -> Result<DatasetPaths, ConfigError> {
        let required = |path: &Option<PathBuf>, name: &'static str| {
            path.clone().ok_or(ConfigError::MissingInput(name))
        };
        Ok(DatasetPaths {
            topics: required(&self.inputs.topics, "topics")?,
            cpm: required(&self.inputs.cpm, "cpm")?,
            global_scores: required(&self.inputs.global_scores, "global_scores")?,
            tissue_scores: self.inputs.tissue_scores.clone(),
        })
    }
}
