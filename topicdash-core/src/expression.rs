//! Replicate-averaged expression (CPM) keyed by gene × tissue × timepoint.
//!
//! Input is a GCT matrix (genes × samples). Each sample column is assigned a
//! tissue and a timepoint, either from the `organ`/`tissue` and `timepoint`
//! column-metadata rows of a GCT 1.3 file, or by parsing
//! `<tissue>_<timepoint>_<replicate>` sample ids. Columns sharing
//! (tissue, timepoint) are averaged once, at load time.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::DataError;
use crate::label::{OrdinalLabel, SampleId};
use crate::table::parse_cell;

/// One aggregated value of a gene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionPoint {
    pub timepoint: OrdinalLabel,
    pub tissue: String,
    pub value: f64,
}

/// Expression of one gene, ordered by tissue and, within a tissue, by timepoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionSeries {
    pub gene: String,
    pub tissue_filter: Option<String>,
    pub points: Vec<ExpressionPoint>,
}

impl ExpressionSeries {
    /// Tissues present in the series, in order.
    pub fn tissues(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for p in &self.points {
            if out.last() != Some(&p.tissue.as_str()) {
                out.push(&p.tissue);
            }
        }
        out
    }

    /// The timepoint-ordered sub-series of one tissue.
    pub fn sub_series<'a>(&'a self, tissue: &'a str) -> impl Iterator<Item = &'a ExpressionPoint> {
        self.points.iter().filter(move |p| p.tissue == tissue)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Aggregated column: one (tissue, timepoint) group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct GroupKey {
    tissue: String,
    timepoint: OrdinalLabel,
}

#[derive(Debug, Clone)]
pub struct ExpressionLookup {
    groups: Vec<GroupKey>,
    genes: HashMap<String, usize>,
    /// `values[gene_row][group]`, NaN where no replicate had a value.
    values: Vec<Vec<f64>>,
    sample_count: usize,
}

impl ExpressionLookup {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_gct(file, &path.display().to_string())
    }

    /// Parse a GCT 1.2 or 1.3 matrix and average replicate columns.
    pub fn from_gct<R: Read>(reader: R, source_name: &str) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut records = rdr.records();
        let mut next_line = |what: &str| -> Result<csv::StringRecord, DataError> {
            match records.next() {
                Some(Ok(r)) => Ok(r),
                Some(Err(e)) => Err(DataError::csv(source_name, e)),
                None => Err(DataError::format(source_name, format!("missing {what} line"))),
            }
        };

        let version = next_line("version")?;
        let version = version.get(0).unwrap_or_default().trim().to_string();
        if version != "#1.2" && version != "#1.3" {
            return Err(DataError::format(
                source_name,
                format!("unsupported GCT version '{version}'"),
            ));
        }

        let dims = next_line("dimensions")?;
        let dims: Vec<usize> = dims
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().parse::<usize>())
            .collect::<Result<_, _>>()
            .map_err(|_| DataError::format(source_name, "dimension line is not numeric"))?;
        let (row_meta, col_meta) = match (version.as_str(), dims.as_slice()) {
            ("#1.2", [_, _]) => (1, 0),
            ("#1.3", [_, _, r, c]) => (*r, *c),
            _ => {
                return Err(DataError::format(
                    source_name,
                    "dimension line does not match GCT version",
                ))
            }
        };
        let declared_genes = dims[0];
        let declared_samples = dims[1];

        let header = next_line("header")?;
        let samples: Vec<String> = header
            .iter()
            .skip(1 + row_meta)
            .map(|s| s.trim().to_string())
            .collect();
        if samples.len() != declared_samples {
            return Err(DataError::format(
                source_name,
                format!(
                    "header lists {} samples, dimension line declares {declared_samples}",
                    samples.len()
                ),
            ));
        }

        let mut column_meta: HashMap<String, Vec<String>> = HashMap::new();
        for _ in 0..col_meta {
            let line = next_line("column metadata")?;
            let name = line.get(0).unwrap_or_default().trim().to_string();
            let values: Vec<String> = line
                .iter()
                .skip(1 + row_meta)
                .map(|s| s.trim().to_string())
                .collect();
            if values.len() != samples.len() {
                return Err(DataError::format(
                    source_name,
                    format!("metadata row '{name}' has {} values", values.len()),
                ));
            }
            column_meta.insert(name, values);
        }

        let assignments = assign_groups(source_name, &samples, &column_meta)?;

        let mut groups: Vec<GroupKey> = assignments.clone();
        groups.sort();
        groups.dedup();
        let group_index: BTreeMap<&GroupKey, usize> =
            groups.iter().enumerate().map(|(i, g)| (g, i)).collect();
        let column_group: Vec<usize> = assignments.iter().map(|g| group_index[g]).collect();

        let mut genes = HashMap::new();
        let mut values = Vec::new();
        for record in records {
            let record = record.map_err(|e| DataError::csv(source_name, e))?;
            let gene = record.get(0).unwrap_or_default().trim().to_string();
            if gene.is_empty() {
                continue;
            }
            let cells: Vec<&str> = record.iter().skip(1 + row_meta).collect();
            if cells.len() != samples.len() {
                return Err(DataError::format(
                    source_name,
                    format!("gene '{gene}' has {} values, expected {}", cells.len(), samples.len()),
                ));
            }

            let mut sums = vec![0.0; groups.len()];
            let mut counts = vec![0usize; groups.len()];
            for (col, cell) in cells.iter().enumerate() {
                let v = parse_cell(cell.trim()).ok_or_else(|| {
                    DataError::format(
                        source_name,
                        format!("gene '{gene}' value '{cell}' is not numeric"),
                    )
                })?;
                if v.is_finite() {
                    sums[column_group[col]] += v;
                    counts[column_group[col]] += 1;
                }
            }
            let means: Vec<f64> = sums
                .iter()
                .zip(&counts)
                .map(|(s, &n)| if n == 0 { f64::NAN } else { s / n as f64 })
                .collect();

            if genes.contains_key(&gene) {
                return Err(DataError::format(source_name, format!("duplicate gene '{gene}'")));
            }
            genes.insert(gene, values.len());
            values.push(means);
        }

        if genes.len() != declared_genes {
            return Err(DataError::format(
                source_name,
                format!(
                    "file has {} gene rows, dimension line declares {declared_genes}",
                    genes.len()
                ),
            ));
        }

        debug!(
            source = source_name,
            genes = genes.len(),
            samples = samples.len(),
            groups = groups.len(),
            "expression matrix loaded"
        );

        Ok(Self {
            groups,
            genes,
            values,
            sample_count: samples.len(),
        })
    }

    /// Series for one gene, optionally restricted to one tissue.
    ///
    /// An unknown tissue filter yields an empty series; an unknown gene is
    /// `UnknownGene`.
    pub fn series_for(
        &self,
        gene: &str,
        tissue_filter: Option<&str>,
    ) -> Result<ExpressionSeries, DataError> {
        let row = self
            .genes
            .get(gene)
            .ok_or_else(|| DataError::UnknownGene(gene.to_string()))?;
        let points = self
            .groups
            .iter()
            .zip(&self.values[*row])
            .filter(|(g, v)| v.is_finite() && tissue_filter.map_or(true, |t| g.tissue == t))
            .map(|(g, v)| ExpressionPoint {
                timepoint: g.timepoint.clone(),
                tissue: g.tissue.clone(),
                value: *v,
            })
            .collect();
        Ok(ExpressionSeries {
            gene: gene.to_string(),
            tissue_filter: tissue_filter.map(String::from),
            points,
        })
    }

    /// Mean value for one (gene, tissue, timepoint), if present.
    pub fn value(&self, gene: &str, tissue: &str, timepoint: &str) -> Option<f64> {
        let row = self.genes.get(gene)?;
        let key = GroupKey {
            tissue: tissue.to_string(),
            timepoint: OrdinalLabel::new(timepoint),
        };
        let col = self.groups.binary_search(&key).ok()?;
        let v = self.values[*row][col];
        v.is_finite().then_some(v)
    }

    pub fn contains_gene(&self, gene: &str) -> bool {
        self.genes.contains_key(gene)
    }

    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Tissues in sorted order.
    pub fn tissues(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self.groups.iter().map(|g| g.tissue.as_str()).collect();
        out.dedup();
        out
    }

    /// Every timepoint seen in any tissue, in ordinal order.
    pub fn timepoints(&self) -> Vec<OrdinalLabel> {
        let mut out: Vec<OrdinalLabel> = self.groups.iter().map(|g| g.timepoint.clone()).collect();
        out.sort();
        out.dedup();
        out
    }
}

fn assign_groups(
    source_name: &str,
    samples: &[String],
    column_meta: &HashMap<String, Vec<String>>,
) -> Result<Vec<GroupKey>, DataError> {
    let tissue_meta = column_meta.get("organ").or_else(|| column_meta.get("tissue"));
    let timepoint_meta = column_meta.get("timepoint");

    match (tissue_meta, timepoint_meta) {
        (Some(tissues), Some(timepoints)) => tissues
            .iter()
            .zip(timepoints)
            .map(|(tissue, tp)| {
                let timepoint = OrdinalLabel::parse(tp).ok_or_else(|| {
                    DataError::format(
                        source_name,
                        format!("timepoint '{tp}' is not of the form <letter><integer>"),
                    )
                })?;
                Ok(GroupKey {
                    tissue: tissue.clone(),
                    timepoint,
                })
            })
            .collect(),
        _ => samples
            .iter()
            .map(|s| {
                let id = SampleId::parse(source_name, s)?;
                Ok(GroupKey {
                    tissue: id.tissue,
                    timepoint: id.timepoint,
                })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GCT_13: &str = "#1.3\n\
2\t4\t1\t2\n\
id\tDescription\ts1\ts2\ts3\ts4\n\
organ\tna\tliver\tliver\tliver\tlung\n\
timepoint\tna\td10\td10\td2\td2\n\
Actb\tbeta-actin\t10\t20\t5\t7\n\
Il6\tinterleukin 6\t1\tNA\t0\t3\n";

    fn lookup() -> ExpressionLookup {
        ExpressionLookup::from_gct(GCT_13.as_bytes(), "cpm").unwrap()
    }

    #[test]
    fn averages_replicates_once() {
        let cpm = lookup();
        assert_eq!(cpm.value("Actb", "liver", "d10"), Some(15.0));
        assert_eq!(cpm.value("Actb", "liver", "d2"), Some(5.0));
        // NA replicate is skipped, not counted as zero.
        assert_eq!(cpm.value("Il6", "liver", "d10"), Some(1.0));
        assert_eq!(cpm.sample_count(), 4);
    }

    #[test]
    fn series_orders_by_tissue_then_timepoint() {
        let series = lookup().series_for("Actb", None).unwrap();
        let shape: Vec<(&str, &str)> = series
            .points
            .iter()
            .map(|p| (p.tissue.as_str(), p.timepoint.as_str()))
            .collect();
        assert_eq!(shape, vec![("liver", "d2"), ("liver", "d10"), ("lung", "d2")]);
        assert_eq!(series.tissues(), vec!["liver", "lung"]);
        assert_eq!(series.sub_series("liver").count(), 2);
    }

    #[test]
    fn tissue_filter_restricts_series() {
        let series = lookup().series_for("Actb", Some("lung")).unwrap();
        assert_eq!(series.points.len(), 1);
        assert_eq!(series.points[0].value, 7.0);
        assert_eq!(series.tissue_filter.as_deref(), Some("lung"));

        let none = lookup().series_for("Actb", Some("heart")).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn unknown_gene_is_reported() {
        let err = lookup().series_for("Tnf", None).unwrap_err();
        assert!(matches!(err, DataError::UnknownGene(g) if g == "Tnf"));
    }

    #[test]
    fn gct_12_falls_back_to_sample_ids() {
        let gct = "#1.2\n2\t3\nName\tDescription\tblood_d1_m1\tblood_d1_m2\tblood_d3_m1\n\
Actb\tx\t2\t4\t8\nCd4\ty\t1\t1\t1\n";
        let cpm = ExpressionLookup::from_gct(gct.as_bytes(), "cpm").unwrap();
        assert_eq!(cpm.value("Actb", "blood", "d1"), Some(3.0));
        assert_eq!(cpm.tissues(), vec!["blood"]);
        let tps: Vec<String> = cpm.timepoints().iter().map(|t| t.to_string()).collect();
        assert_eq!(tps, vec!["d1", "d3"]);
    }

    #[test]
    fn rejects_duplicate_gene_rows() {
        let gct = "#1.2\n2\t2\nName\tDescription\tblood_d1_m1\tblood_d3_m1\n\
Actb\tx\t2\t4\nActb\tx\t100\t100\n";
        let err = ExpressionLookup::from_gct(gct.as_bytes(), "cpm").unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
        assert!(err.to_string().contains("duplicate gene 'Actb'"));
    }

    #[test]
    fn rejects_gene_count_mismatch() {
        let gct = "#1.2\n5\t1\nName\tDescription\tblood_d1_m1\nActb\tx\t2\n";
        let err = ExpressionLookup::from_gct(gct.as_bytes(), "cpm").unwrap_err();
        assert!(matches!(err, DataError::Format { .. }));
        assert!(err.to_string().contains("declares 5"));
    }

    #[test]
    fn rejects_unknown_version() {
        let err = ExpressionLookup::from_gct("#2.0\n".as_bytes(), "cpm").unwrap_err();
        assert!(err.to_string().contains("unsupported GCT version"));
    }

    #[test]
    fn rejects_sample_count_mismatch() {
        let gct = "#1.2\n1\t3\nName\tDescription\tblood_d1_m1\n";
        assert!(ExpressionLookup::from_gct(gct.as_bytes(), "cpm").is_err());
    }
}
