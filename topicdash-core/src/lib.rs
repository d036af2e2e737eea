//! topicdash core: the read-only data layer of the dashboard.
//!
//! Everything here is loaded once at startup and never mutated afterwards:
//! - Ordinal labels for timepoints and topics (`d2` sorts before `d10`)
//! - `ScoreStore`: signed, ranked gene/topic correlation lists
//! - `ExpressionLookup`: replicate-averaged CPM per gene × tissue × timepoint
//! - `TopicTimecourse`: mean topic weight per tissue × timepoint × topic
//! - Input fingerprints and the `Dataset` bundle tying the sources together

pub mod dataset;
pub mod error;
pub mod expression;
pub mod fingerprint;
pub mod label;
pub mod scores;
mod table;
pub mod topics;

pub use dataset::{Dataset, DatasetPaths};
pub use error::DataError;
pub use expression::{ExpressionLookup, ExpressionPoint, ExpressionSeries};
pub use fingerprint::SourceFingerprint;
pub use label::{OrdinalLabel, SampleId};
pub use scores::{RankedScoreList, ScoreKey, ScoreRecord, ScoreScope, ScoreStore, Sign};
pub use topics::{TopicTimecourse, TopicWeight};
