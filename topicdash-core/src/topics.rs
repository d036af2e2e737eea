//! Topic weights over time.
//!
//! The source table has one row per sample (`<tissue>_<timepoint>_<replicate>`)
//! and one numeric column per topic. Replicates are averaged per
//! (tissue, timepoint, topic), and separately per (timepoint, topic) across
//! all tissues for the pooled view.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::DataError;
use crate::label::{OrdinalLabel, SampleId};
use crate::table::{parse_cell, CsvTable};

/// One aggregated bar segment. `tissue` is `None` in the pooled view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicWeight {
    pub tissue: Option<String>,
    pub timepoint: OrdinalLabel,
    pub topic: OrdinalLabel,
    pub weight: f64,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    n: usize,
}

impl Mean {
    fn add(&mut self, v: f64) {
        self.sum += v;
        self.n += 1;
    }

    fn value(self) -> f64 {
        self.sum / self.n as f64
    }
}

#[derive(Debug, Clone)]
pub struct TopicTimecourse {
    tissues: Vec<String>,
    timepoints: Vec<OrdinalLabel>,
    topics: Vec<OrdinalLabel>,
    by_tissue: BTreeMap<(String, OrdinalLabel, OrdinalLabel), f64>,
    pooled: BTreeMap<(OrdinalLabel, OrdinalLabel), f64>,
    sample_count: usize,
}

impl TopicTimecourse {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Load per-sample topic weights from CSV. The first column holds sample
    /// identifiers whatever its header; every other named column is a topic.
    pub fn from_reader<R: Read>(reader: R, source_name: &str) -> Result<Self, DataError> {
        let table = CsvTable::read(reader, source_name)?;
        if table.headers.is_empty() {
            return Err(DataError::format(source_name, "empty header"));
        }

        let topic_cols: Vec<(usize, OrdinalLabel)> = table
            .headers
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, h)| !h.is_empty())
            .map(|(i, h)| (i, OrdinalLabel::new(h.as_str())))
            .collect();
        if topic_cols.is_empty() {
            return Err(DataError::format(source_name, "no topic columns"));
        }

        let mut by_tissue: BTreeMap<(String, OrdinalLabel, OrdinalLabel), Mean> = BTreeMap::new();
        let mut pooled: BTreeMap<(OrdinalLabel, OrdinalLabel), Mean> = BTreeMap::new();
        let mut tissues = BTreeSet::new();
        let mut timepoints = BTreeSet::new();

        for row in &table.rows {
            let sample = SampleId::parse(source_name, &row[0])?;
            tissues.insert(sample.tissue.clone());
            timepoints.insert(sample.timepoint.clone());

            for (col, topic) in &topic_cols {
                let weight = parse_cell(&row[*col]).ok_or_else(|| {
                    DataError::format(
                        source_name,
                        format!("sample '{}' topic '{topic}' is not numeric", row[0]),
                    )
                })?;
                if !weight.is_finite() {
                    continue;
                }
                by_tissue
                    .entry((sample.tissue.clone(), sample.timepoint.clone(), topic.clone()))
                    .or_default()
                    .add(weight);
                pooled
                    .entry((sample.timepoint.clone(), topic.clone()))
                    .or_default()
                    .add(weight);
            }
        }

        let mut topics: Vec<OrdinalLabel> = topic_cols.into_iter().map(|(_, t)| t).collect();
        topics.sort();
        topics.dedup();

        debug!(
            source = source_name,
            samples = table.rows.len(),
            tissues = tissues.len(),
            timepoints = timepoints.len(),
            topics = topics.len(),
            "topic weights loaded"
        );

        Ok(Self {
            tissues: tissues.into_iter().collect(),
            timepoints: timepoints.into_iter().collect(),
            topics,
            by_tissue: by_tissue.into_iter().map(|(k, m)| (k, m.value())).collect(),
            pooled: pooled.into_iter().map(|(k, m)| (k, m.value())).collect(),
            sample_count: table.rows.len(),
        })
    }

    pub fn tissues(&self) -> &[String] {
        &self.tissues
    }

    pub fn timepoints(&self) -> &[OrdinalLabel] {
        &self.timepoints
    }

    pub fn topics(&self) -> &[OrdinalLabel] {
        &self.topics
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn has_tissue(&self, tissue: &str) -> bool {
        self.tissues.iter().any(|t| t == tissue)
    }

    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.as_str() == topic)
    }

    /// Mean weight of one bar segment; `tissue = None` reads the pooled mean.
    pub fn weight(&self, tissue: Option<&str>, timepoint: &str, topic: &str) -> Option<f64> {
        let timepoint = OrdinalLabel::new(timepoint);
        let topic = OrdinalLabel::new(topic);
        match tissue {
            Some(t) => self
                .by_tissue
                .get(&(t.to_string(), timepoint, topic))
                .copied(),
            None => self.pooled.get(&(timepoint, topic)).copied(),
        }
    }

    /// Segments of one stacked bar, in topic order.
    pub fn stack(&self, tissue: Option<&str>, timepoint: &OrdinalLabel) -> Vec<(OrdinalLabel, f64)> {
        self.topics
            .iter()
            .filter_map(|topic| {
                let w = match tissue {
                    Some(t) => self
                        .by_tissue
                        .get(&(t.to_string(), timepoint.clone(), topic.clone())),
                    None => self.pooled.get(&(timepoint.clone(), topic.clone())),
                };
                w.map(|w| (topic.clone(), *w))
            })
            .collect()
    }

    /// All aggregated segments, tissue-faceted or pooled, in display order.
    pub fn weights(&self, pooled: bool) -> Vec<TopicWeight> {
        if pooled {
            self.pooled
                .iter()
                .map(|((timepoint, topic), w)| TopicWeight {
                    tissue: None,
                    timepoint: timepoint.clone(),
                    topic: topic.clone(),
                    weight: *w,
                })
                .collect()
        } else {
            self.by_tissue
                .iter()
                .map(|((tissue, timepoint, topic), w)| TopicWeight {
                    tissue: Some(tissue.clone()),
                    timepoint: timepoint.clone(),
                    topic: topic.clone(),
                    weight: *w,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOPICS: &str = ",k1,k2,k10\n\
liver_d7_m1,0.2,0.6,0.2\n\
liver_d7_m2,0.4,0.4,0.2\n\
liver_d1_m1,1.0,0.0,0.0\n\
lung_d7_m1,0.0,0.0,1.0\n";

    fn timecourse() -> TopicTimecourse {
        TopicTimecourse::from_reader(TOPICS.as_bytes(), "topics").unwrap()
    }

    #[test]
    fn averages_replicates_per_tissue() {
        let tc = timecourse();
        let w = tc.weight(Some("liver"), "d7", "k1").unwrap();
        assert!((w - 0.3).abs() < 1e-12);
        assert_eq!(tc.weight(Some("liver"), "d1", "k1"), Some(1.0));
        assert_eq!(tc.sample_count(), 4);
    }

    #[test]
    fn pooled_mean_spans_tissues() {
        let tc = timecourse();
        // d7 samples: 0.2, 0.4, 0.0
        let w = tc.weight(None, "d7", "k1").unwrap();
        assert!((w - 0.2).abs() < 1e-12);
    }

    #[test]
    fn axes_are_ordinal() {
        let tc = timecourse();
        let topics: Vec<&str> = tc.topics().iter().map(|t| t.as_str()).collect();
        assert_eq!(topics, vec!["k1", "k2", "k10"]);
        let tps: Vec<&str> = tc.timepoints().iter().map(|t| t.as_str()).collect();
        assert_eq!(tps, vec!["d1", "d7"]);
        assert_eq!(tc.tissues(), &["liver", "lung"]);
    }

    #[test]
    fn stack_follows_topic_order() {
        let tc = timecourse();
        let d7 = OrdinalLabel::new("d7");
        let stack = tc.stack(Some("lung"), &d7);
        let topics: Vec<&str> = stack.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(topics, vec!["k1", "k2", "k10"]);
        assert_eq!(stack[2].1, 1.0);
    }

    #[test]
    fn bad_sample_id_is_format_error() {
        let err = TopicTimecourse::from_reader("sample,k1\nliver-d7,0.5\n".as_bytes(), "topics")
            .unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
    }
}
