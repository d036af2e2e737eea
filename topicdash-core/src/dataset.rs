//! The bundle of tables a dashboard session is built from.
//!
//! Every input is read into memory once, fingerprinted, then parsed from the
//! same bytes. Any failure aborts the whole load: a dashboard never starts
//! with a table missing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::DataError;
use crate::expression::ExpressionLookup;
use crate::fingerprint::SourceFingerprint;
use crate::scores::{ScoreScope, ScoreStore};
use crate::topics::TopicTimecourse;

/// Locations of the input tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub topics: PathBuf,
    pub cpm: PathBuf,
    pub global_scores: PathBuf,
    pub tissue_scores: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    pub timecourse: TopicTimecourse,
    pub expression: Arc<ExpressionLookup>,
    pub global_scores: Arc<ScoreStore>,
    pub tissue_scores: Option<Arc<ScoreStore>>,
    pub fingerprints: Vec<SourceFingerprint>,
}

impl Dataset {
    pub fn load(paths: &DatasetPaths) -> Result<Self, DataError> {
        let mut fingerprints = Vec::new();

        let bytes = read_input(&paths.topics)?;
        fingerprints.push(SourceFingerprint::of_bytes("topics", &paths.topics, &bytes));
        let timecourse = TopicTimecourse::from_reader(bytes.as_slice(), &display(&paths.topics))?;

        let bytes = read_input(&paths.cpm)?;
        fingerprints.push(SourceFingerprint::of_bytes("cpm", &paths.cpm, &bytes));
        let expression = ExpressionLookup::from_gct(bytes.as_slice(), &display(&paths.cpm))?;

        let bytes = read_input(&paths.global_scores)?;
        fingerprints.push(SourceFingerprint::of_bytes(
            "global_scores",
            &paths.global_scores,
            &bytes,
        ));
        let global_scores = ScoreStore::from_reader(
            bytes.as_slice(),
            &display(&paths.global_scores),
            ScoreScope::Global,
        )?;

        let tissue_scores = match &paths.tissue_scores {
            Some(path) => {
                let bytes = read_input(path)?;
                fingerprints.push(SourceFingerprint::of_bytes("tissue_scores", path, &bytes));
                Some(ScoreStore::from_reader(
                    bytes.as_slice(),
                    &display(path),
                    ScoreScope::TissueScoped,
                )?)
            }
            None => None,
        };

        for fp in &fingerprints {
            info!(role = %fp.role, path = %fp.path.display(), bytes = fp.bytes, digest = fp.short(), "input loaded");
        }

        let dataset = Self {
            timecourse,
            expression: Arc::new(expression),
            global_scores: Arc::new(global_scores),
            tissue_scores: tissue_scores.map(Arc::new),
            fingerprints,
        };

        let missing = dataset.genes_missing_expression();
        if !missing.is_empty() {
            warn!(
                count = missing.len(),
                first = %missing[0],
                "ranked genes without expression data; their table rows will fail to render"
            );
        }

        Ok(dataset)
    }

    /// Ranked genes (in any score table) that the expression matrix lacks.
    pub fn genes_missing_expression(&self) -> Vec<String> {
        let mut genes = self.global_scores.ranked_genes();
        if let Some(tissue) = &self.tissue_scores {
            genes.extend(tissue.ranked_genes());
        }
        genes
            .into_iter()
            .filter(|g| !self.expression.contains_gene(g))
            .map(String::from)
            .collect()
    }
}

fn read_input(path: &Path) -> Result<Vec<u8>, DataError> {
    std::fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn display(path: &Path) -> String {
    path.display().to_string()
}
