//! Time-series algorithms behind the correlation engine.
//!
//! Modules include:
//! - `normalize`: collapse raw feeds into per-attribute series
//! - `infer`: infer the dominant sampling interval
//! - `merge`: tolerance-bounded nearest-time join
//! - `resample`: bucket, forward-fill and exact-join on a uniform grid
//! - `shift`: elapsed and calendar-aware timestamp shifting
//! - `stats`: Pearson correlation and rounding
//! - `sweep`: lag sweep with best-lag selection
/// Sampling interval inference.
pub mod infer;
/// Nearest-time merge of two series.
pub mod merge;
/// Raw feed normalization.
pub mod normalize;
/// Grid resampling for the resample-then-join policy.
pub mod resample;
/// Timestamp shifting by lag units.
pub mod shift;
/// Correlation statistics.
pub mod stats;
/// Lag sweep correlator.
pub mod sweep;
