//! Lagcorr correlates trend data of many assets against each other.
//!
//! Overview
//! - Fetches raw trend feeds through one `TrendSource` (see `lagcorr_core::source`).
//! - Normalizes each selected attribute into a deduplicated, time-sorted series in a
//!   reference timezone and infers its sampling interval.
//! - Sweeps every pair across calendar-aware lag windows and reports the strongest
//!   Pearson correlation, together with every evaluated step.
//!
//! Key behaviors and trade-offs
//! - Alignment:
//!   - `NearestTolerance`: each sample of the faster series is matched to the nearest
//!     sample of the other within that series' interval; raw timestamps survive, but
//!     samples without a partner are dropped.
//!   - `ResampleThenJoin`: both series are averaged onto the coarser grid and forward
//!     filled; smoother, but long gaps can inflate the correlation.
//! - Calendar lags: day, month and year shifts move the local wall clock, so a one
//!   day lag across a DST change is 23 or 25 hours, and month ends are clamped.
//! - Rounding: correlations are rounded to 4 decimals before the best lag is picked,
//!   so near ties resolve to the step evaluated first.
//! - Failures: a failing asset or a missing attribute degrades into a warning on the
//!   report; only invalid requests and exceeded deadlines fail the call.
//!
//! Examples
//! Building an orchestrator:
//! ```rust,ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lagcorr::{AlignmentPolicy, Lagcorr};
//!
//! let lc = Lagcorr::builder()
//!     .with_source(Arc::new(MySource::new()))
//!     .alignment(AlignmentPolicy::NearestTolerance)
//!     .source_timeout(Duration::from_secs(10))
//!     .build()?;
//! ```
//!
//! Correlating a request:
//! ```rust,ignore
//! use lagcorr::CorrelationRequest;
//!
//! let req = CorrelationRequest::from_json(r#"{
//!     "assets": [{"asset_id": 1, "attribute_name": "temp"}, {"asset_id": 2}],
//!     "lags": [{"hours": 2}]
//! }"#)?;
//! let report = lc.correlate(&req).await?;
//! for (pair, result) in &report.correlations {
//!     println!("{pair}: {:?} at {}", result.best_correlation, result.best_lag);
//! }
//! ```
//!
//! See `lagcorr/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

pub(crate) mod core;
mod router;

pub use core::{Lagcorr, LagcorrBuilder};
pub use router::aggregate::CorrelationAggregator;
pub use router::pairwise::PairAnalysis;
pub use router::util::join_with_deadline;

// Re-export core types for convenience
pub use lagcorr_core::{
    AlignedRow,
    AlignmentPolicy,
    AssetSelection,
    CorrelationReport,
    CorrelationRequest,
    FetchWindow,
    Frequency,
    FrequencyUnit,
    LagDetail,
    LagSpec,
    LagUnit,
    LagcorrConfig,
    LagcorrError,
    NormalizedSeries,
    PairResult,
    RawSample,
    SeriesSummary,
    TrendSource,
    pair_key,
};
