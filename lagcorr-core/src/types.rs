//! Re-export of the wire and configuration types from `lagcorr-types`.
// Consolidated re-exports so downstream crates can depend on `lagcorr-core` only

pub use lagcorr_types::{AlignmentPolicy, LagcorrConfig, LagcorrError};

pub use lagcorr_types::{AssetSelection, CorrelationRequest, LagSpec, LagUnit};

pub use lagcorr_types::{
    CorrelationReport, LagDetail, PairResult, SeriesSummary, pair_key, split_pair_key,
};
