//! Ordinal labels and sample identifiers.
//!
//! Timepoints (`d1`, `d7`, `d14`) and topics (`k1` .. `k26`) are a letter
//! prefix followed by an integer, and order by the integer: `d2 < d10`.
//! Sample identifiers have the shape `<tissue>_<timepoint>_<replicate>`,
//! where the tissue itself may contain underscores.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// A label that sorts by its integer suffix when it has one.
///
/// Labels without a `<letter><integer>` shape sort after all ordinal labels,
/// alphabetically among themselves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrdinalLabel {
    label: String,
    ordinal: Option<u32>,
}

impl OrdinalLabel {
    /// Build a label, accepting any text.
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        let ordinal = split_ordinal(&label).map(|(_, n)| n);
        Self { label, ordinal }
    }

    /// Build a label that must have the `<letter><integer>` shape.
    pub fn parse(label: &str) -> Option<Self> {
        split_ordinal(label).map(|(_, n)| Self {
            label: label.to_string(),
            ordinal: Some(n),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.ordinal
    }
}

fn split_ordinal(label: &str) -> Option<(&str, u32)> {
    let digits_at = label.find(|c: char| c.is_ascii_digit())?;
    let (prefix, digits) = label.split_at(digits_at);
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().map(|n| (prefix, n))
}

impl Ord for OrdinalLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.ordinal, other.ordinal) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.label.cmp(&other.label)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.label.cmp(&other.label),
        }
    }
}

impl PartialOrd for OrdinalLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OrdinalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Parsed `<tissue>_<timepoint>_<replicate>` sample identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleId {
    pub tissue: String,
    pub timepoint: OrdinalLabel,
    pub replicate: String,
}

impl SampleId {
    /// Split on the last two underscores, so `small_intestine_d7_m2` yields
    /// tissue `small_intestine`.
    pub fn parse(source_name: &str, raw: &str) -> Result<Self, DataError> {
        let mut parts = raw.rsplitn(3, '_');
        let replicate = parts.next().unwrap_or_default();
        let timepoint = parts.next();
        let tissue = parts.next();

        let (Some(timepoint), Some(tissue)) = (timepoint, tissue) else {
            return Err(DataError::format(
                source_name,
                format!("sample '{raw}' is not of the form <tissue>_<timepoint>_<replicate>"),
            ));
        };
        if tissue.is_empty() {
            return Err(DataError::format(
                source_name,
                format!("sample '{raw}' has an empty tissue"),
            ));
        }
        let timepoint = OrdinalLabel::parse(timepoint).ok_or_else(|| {
            DataError::format(
                source_name,
                format!("sample '{raw}' has timepoint '{timepoint}', expected <letter><integer>"),
            )
        })?;

        Ok(Self {
            tissue: tissue.to_string(),
            timepoint,
            replicate: replicate.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timepoints_order_numerically() {
        let mut labels: Vec<OrdinalLabel> = ["d14", "d2", "d10", "d1"]
            .into_iter()
            .map(OrdinalLabel::new)
            .collect();
        labels.sort();
        let sorted: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        assert_eq!(sorted, vec!["d1", "d2", "d10", "d14"]);
    }

    #[test]
    fn non_ordinal_labels_sort_last() {
        let mut labels = vec![
            OrdinalLabel::new("baseline"),
            OrdinalLabel::new("k3"),
            OrdinalLabel::new("k12"),
        ];
        labels.sort();
        assert_eq!(labels[0].as_str(), "k3");
        assert_eq!(labels[1].as_str(), "k12");
        assert_eq!(labels[2].as_str(), "baseline");
    }

    #[test]
    fn strict_parse_rejects_malformed() {
        assert!(OrdinalLabel::parse("d7").is_some());
        assert!(OrdinalLabel::parse("7").is_none());
        assert!(OrdinalLabel::parse("d7b").is_none());
        assert!(OrdinalLabel::parse("day").is_none());
        assert_eq!(OrdinalLabel::parse("hr24").and_then(|l| l.ordinal()), Some(24));
    }

    #[test]
    fn sample_id_keeps_underscored_tissue() {
        let id = SampleId::parse("topics", "small_intestine_d7_m2").unwrap();
        assert_eq!(id.tissue, "small_intestine");
        assert_eq!(id.timepoint.as_str(), "d7");
        assert_eq!(id.replicate, "m2");
    }

    #[test]
    fn sample_id_requires_three_parts() {
        let err = SampleId::parse("topics", "liver_d7").unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
        assert!(SampleId::parse("topics", "liver_seven_m1").is_err());
        assert!(SampleId::parse("topics", "_d1_m1").is_err());
    }
}
