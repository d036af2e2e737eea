//! Error taxonomy for the data layer.
//!
//! `Format`, `Io` and `Csv` are load-time failures and abort startup.
//! `UnknownKey` and `UnknownGene` are per-request failures: they surface to
//! whoever issued the query and leave the loaded tables untouched.

use std::path::PathBuf;

use thiserror::Error;

use crate::scores::ScoreKey;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("malformed {source_name}: {reason}")]
    Format { source_name: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {source_name}: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("no scores loaded for key '{0}'")]
    UnknownKey(ScoreKey),

    #[error("gene '{0}' not found in expression data")]
    UnknownGene(String),
}

impl DataError {
    pub(crate) fn format(source_name: &str, reason: impl Into<String>) -> Self {
        DataError::Format {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn csv(source_name: &str, source: csv::Error) -> Self {
        DataError::Csv {
            source_name: source_name.to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_name_their_source() {
        let err = DataError::format("scores", "missing 'gene' column");
        assert!(matches!(&err, DataError::Format { source_name, .. } if source_name == "scores"));
        assert!(err.to_string().contains("missing 'gene' column"));
    }

    #[test]
    fn messages_name_the_offender() {
        let err = DataError::UnknownGene("Il6".into());
        assert_eq!(err.to_string(), "gene 'Il6' not found in expression data");

        let err = DataError::UnknownKey(ScoreKey::tissue("liver", "k3"));
        assert_eq!(err.to_string(), "no scores loaded for key 'liver/k3'");
    }
}
