//! Minimal CSV table reader shared by the loaders.

use std::io::Read;

use crate::error::DataError;

/// A fully materialized CSV table: header row plus string cells.
pub(crate) struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn read<R: Read>(reader: R, source_name: &str) -> Result<Self, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| DataError::csv(source_name, e))?
            .iter()
            .map(String::from)
            .collect();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(|e| DataError::csv(source_name, e))?;
            rows.push(record.iter().map(String::from).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Index of the first header matching any of `names`.
    pub fn column(&self, names: &[&str]) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| names.iter().any(|n| h == n))
    }
}

/// Parse a numeric cell. Missing-value markers become NaN; anything else
/// that fails to parse is `None`.
pub(crate) fn parse_cell(cell: &str) -> Option<f64> {
    match cell {
        "" | "NA" | "na" | "NaN" | "nan" | "null" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}
