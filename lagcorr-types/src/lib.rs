//! Lagcorr data transfer objects, wire contracts and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod lag;
mod reports;
mod request;

pub use config::{AlignmentPolicy, LagcorrConfig};
pub use error::LagcorrError;
pub use lag::{LagSpec, LagUnit, windows};
pub use reports::{
    CorrelationReport, LagDetail, PairResult, SeriesSummary, pair_key, split_pair_key,
};
pub use request::{AssetSelection, CorrelationRequest};
