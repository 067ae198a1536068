//! lagcorr-core
//!
//! Series model, algorithms and the data-source seam of the lagcorr engine.
//!
//! - `series`: raw samples, normalized series and inferred frequencies.
//! - `source`: the `TrendSource` trait implemented by data backends.
//! - `timeseries`: normalization, alignment and lag-sweep correlation.
//!
//! Everything here is synchronous and pure except `TrendSource`, which is an
//! `async_trait` so backends can be driven from the Tokio-based orchestrator.
#![warn(missing_docs)]

/// Series model.
pub mod series;
/// Data source trait.
pub mod source;
/// Time-series algorithms.
pub mod timeseries;
pub mod types;

pub use series::{AlignedRow, Frequency, FrequencyUnit, NormalizedSeries, Point, RawSample};
pub use source::{FetchWindow, TrendSource};
pub use timeseries::infer::{decode_delta, estimate_step, infer_frequency};
pub use timeseries::merge::{Driver, MergePlan, merge_nearest};
pub use timeseries::normalize::{NormalizedFeed, collapse_rows, normalize_feed, series_label};
pub use timeseries::shift::shift_timestamp;
pub use timeseries::stats::{pearson, round4};
pub use timeseries::sweep::{LagSweep, PairAlignment};
pub use types::*;
