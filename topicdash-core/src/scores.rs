//! Gene/topic correlation scores and their signed rankings.
//!
//! Two table shapes are supported:
//! - global: `gene,k1,k2,...`: one ranking per topic
//! - tissue-scoped: `tissue,gene,k1,k2,...`: one ranking per (tissue, topic),
//!   each tissue ranked only against its own rows
//!
//! For every key the rows split into a strictly-positive list (descending)
//! and a strictly-negative list (ascending, most negative first). Zero and
//! missing scores belong to neither. Equal scores keep their input order.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DataError;
use crate::label::OrdinalLabel;
use crate::table::{parse_cell, CsvTable};

/// Direction of correlation a ranking is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
}

impl Sign {
    pub fn toggled(self) -> Sign {
        match self {
            Sign::Positive => Sign::Negative,
            Sign::Negative => Sign::Positive,
        }
    }

    /// Selector label shown next to the table.
    pub fn label(self) -> &'static str {
        match self {
            Sign::Positive => "positive score",
            Sign::Negative => "negative score",
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => f.write_str("positive"),
            Sign::Negative => f.write_str("negative"),
        }
    }
}

/// Which key shape a store is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScope {
    Global,
    TissueScoped,
}

impl fmt::Display for ScoreScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreScope::Global => f.write_str("global"),
            ScoreScope::TissueScoped => f.write_str("tissue-scoped"),
        }
    }
}

/// Selection key: a topic, optionally within one tissue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScoreKey {
    pub tissue: Option<String>,
    pub topic: String,
}

impl ScoreKey {
    pub fn global(topic: impl Into<String>) -> Self {
        Self {
            tissue: None,
            topic: topic.into(),
        }
    }

    pub fn tissue(tissue: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            tissue: Some(tissue.into()),
            topic: topic.into(),
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tissue {
            Some(tissue) => write!(f, "{}/{}", tissue, self.topic),
            None => f.write_str(&self.topic),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub gene: String,
    pub topic: String,
    pub tissue: Option<String>,
    pub score: f64,
}

/// Records sharing one `(key, sign)`; the index of a record is its rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedScoreList {
    key: ScoreKey,
    sign: Sign,
    records: Vec<ScoreRecord>,
}

impl RankedScoreList {
    /// Partition-and-sort `records` for one sign. Stable, so ties keep input order.
    fn build(key: ScoreKey, sign: Sign, records: &[ScoreRecord]) -> Self {
        let mut kept: Vec<ScoreRecord> = records
            .iter()
            .filter(|r| match sign {
                Sign::Positive => r.score > 0.0,
                Sign::Negative => r.score < 0.0,
            })
            .cloned()
            .collect();
        match sign {
            Sign::Positive => kept.sort_by(|a, b| b.score.total_cmp(&a.score)),
            Sign::Negative => kept.sort_by(|a, b| a.score.total_cmp(&b.score)),
        }
        Self {
            key,
            sign,
            records: kept,
        }
    }

    pub fn key(&self) -> &ScoreKey {
        &self.key
    }

    pub fn sign(&self) -> Sign {
        self.sign
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, rank: usize) -> Option<&ScoreRecord> {
        self.records.get(rank)
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Records for ranks `[start, start + len)`, truncated to the list.
    pub fn window(&self, start: usize, len: usize) -> &[ScoreRecord] {
        let start = start.min(self.records.len());
        let end = start.saturating_add(len).min(self.records.len());
        &self.records[start..end]
    }
}

#[derive(Debug, Clone)]
struct SignedLists {
    positive: RankedScoreList,
    negative: RankedScoreList,
}

/// Immutable index of ranked score lists.
#[derive(Debug, Clone)]
pub struct ScoreStore {
    scope: ScoreScope,
    topics: Vec<String>,
    tissues: Vec<String>,
    keys: Vec<ScoreKey>,
    gene_count: usize,
    lists: HashMap<ScoreKey, SignedLists>,
}

impl ScoreStore {
    pub fn from_path(path: &Path, scope: ScoreScope) -> Result<Self, DataError> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string(), scope)
    }

    /// Load a score table from CSV.
    ///
    /// Fails with `DataError::Format` when the `gene` column (or, for the
    /// tissue-scoped shape, the `tissue`/`organ` column) is missing, when no
    /// topic column remains, or when a topic cell is not numeric.
    pub fn from_reader<R: Read>(
        reader: R,
        source_name: &str,
        scope: ScoreScope,
    ) -> Result<Self, DataError> {
        let table = CsvTable::read(reader, source_name)?;

        let gene_col = table
            .column(&["gene"])
            .ok_or_else(|| DataError::format(source_name, "missing 'gene' column"))?;
        let tissue_col = match scope {
            ScoreScope::Global => None,
            ScoreScope::TissueScoped => Some(table.column(&["tissue", "organ"]).ok_or_else(
                || DataError::format(source_name, "missing 'tissue' (or 'organ') column"),
            )?),
        };

        let topic_cols: Vec<(usize, &str)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != gene_col && Some(*i) != tissue_col && !h.is_empty())
            .map(|(i, h)| (i, h.as_str()))
            .collect();
        if topic_cols.is_empty() {
            return Err(DataError::format(source_name, "no topic columns"));
        }
        let mut seen_topics = HashSet::new();
        for &(_, topic) in &topic_cols {
            if !seen_topics.insert(topic) {
                return Err(DataError::format(
                    source_name,
                    format!("duplicate topic column '{topic}'"),
                ));
            }
        }

        // Records grouped per key, in input order.
        let mut grouped: HashMap<ScoreKey, Vec<ScoreRecord>> = HashMap::new();
        let mut tissues = BTreeSet::new();
        let mut genes = BTreeSet::new();
        let mut seen_rows = HashSet::new();

        for (line, row) in table.rows.iter().enumerate() {
            let gene = &row[gene_col];
            let tissue = tissue_col.map(|c| row[c].clone());
            if !seen_rows.insert((tissue.clone(), gene.clone())) {
                let place = tissue.as_deref().map(|t| format!(" in '{t}'")).unwrap_or_default();
                return Err(DataError::format(
                    source_name,
                    format!("row {}: duplicate gene '{gene}'{place}", line + 2),
                ));
            }
            if let Some(t) = &tissue {
                tissues.insert(t.clone());
            }
            genes.insert(gene.clone());

            for &(col, topic) in &topic_cols {
                let score = parse_cell(&row[col]).ok_or_else(|| {
                    DataError::format(
                        source_name,
                        format!(
                            "row {}: topic '{topic}' value '{}' is not numeric",
                            line + 2,
                            row[col]
                        ),
                    )
                })?;
                let key = ScoreKey {
                    tissue: tissue.clone(),
                    topic: topic.to_string(),
                };
                grouped.entry(key).or_default().push(ScoreRecord {
                    gene: gene.clone(),
                    topic: topic.to_string(),
                    tissue: tissue.clone(),
                    score,
                });
            }
        }

        let mut topics: Vec<OrdinalLabel> =
            topic_cols.iter().map(|(_, t)| OrdinalLabel::new(*t)).collect();
        topics.sort();
        topics.dedup();
        let topics: Vec<String> = topics.into_iter().map(|t| t.as_str().to_string()).collect();
        let tissues: Vec<String> = tissues.into_iter().collect();

        let keys: Vec<ScoreKey> = match scope {
            ScoreScope::Global => topics.iter().map(ScoreKey::global).collect(),
            ScoreScope::TissueScoped => tissues
                .iter()
                .flat_map(|tissue| topics.iter().map(move |t| ScoreKey::tissue(tissue, t)))
                .collect(),
        };

        let mut lists = HashMap::with_capacity(keys.len());
        for key in &keys {
            let records = grouped.remove(key).unwrap_or_default();
            let signed = SignedLists {
                positive: RankedScoreList::build(key.clone(), Sign::Positive, &records),
                negative: RankedScoreList::build(key.clone(), Sign::Negative, &records),
            };
            lists.insert(key.clone(), signed);
        }

        debug!(
            source = source_name,
            %scope,
            topics = topics.len(),
            tissues = tissues.len(),
            genes = genes.len(),
            "score table loaded"
        );

        Ok(Self {
            scope,
            topics,
            tissues,
            keys,
            gene_count: genes.len(),
            lists,
        })
    }

    /// Ranked list for `(key, sign)`, or `UnknownKey` when the key was not loaded.
    pub fn ranked_list(&self, key: &ScoreKey, sign: Sign) -> Result<&RankedScoreList, DataError> {
        let lists = self
            .lists
            .get(key)
            .ok_or_else(|| DataError::UnknownKey(key.clone()))?;
        Ok(match sign {
            Sign::Positive => &lists.positive,
            Sign::Negative => &lists.negative,
        })
    }

    pub fn contains_key(&self, key: &ScoreKey) -> bool {
        self.lists.contains_key(key)
    }

    pub fn scope(&self) -> ScoreScope {
        self.scope
    }

    /// Topics in ordinal order (`k2` before `k10`).
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    /// Tissues in sorted order; empty for the global shape.
    pub fn tissues(&self) -> &[String] {
        &self.tissues
    }

    /// All loaded keys: tissues sorted, then topics in ordinal order.
    pub fn keys(&self) -> &[ScoreKey] {
        &self.keys
    }

    pub fn gene_count(&self) -> usize {
        self.gene_count
    }

    /// Every gene that appears in at least one ranked list.
    pub fn ranked_genes(&self) -> BTreeSet<&str> {
        self.lists
            .values()
            .flat_map(|l| l.positive.records.iter().chain(l.negative.records.iter()))
            .map(|r| r.gene.as_str())
            .collect()
    }
}
