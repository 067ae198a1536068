//! Result records and report envelopes produced by the correlation engine.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::error::LagcorrError;
use crate::lag::{LagSpec, LagUnit};

/// One evaluated step of a lag sweep that produced a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LagDetail {
    /// Unit of the step.
    pub lag_unit: LagUnit,
    /// Signed number of units the second series was shifted by.
    pub lag_step: i64,
    /// Correlation at this step, rounded to 4 decimals.
    pub correlation: f64,
}

/// Correlation outcome for one ordered pair of series.
///
/// The field names are the wire contract consumed by reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairResult {
    /// Strongest correlation found, rounded to 4 decimals.
    pub best_correlation: Option<f64>,
    /// Signed step at which `best_correlation` was found; 0 when unlagged.
    pub best_lag: i64,
    /// Unit of `best_lag`; `None` when unlagged or nothing was found.
    pub lag_unit: Option<LagUnit>,
    /// Every sweep step that produced a correlation, in sweep order.
    #[serde(default)]
    pub lag_details: Vec<LagDetail>,
}

impl PairResult {
    /// Result for a pair with no computable correlation.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            best_correlation: None,
            best_lag: 0,
            lag_unit: None,
            lag_details: Vec::new(),
        }
    }

    /// Result of correlating a well-formed series with itself.
    ///
    /// Perfect correlation at step 0, with one step-0 detail per window. The
    /// other steps are not evaluated, so unlike swept pairs the details do not
    /// list every step that would produce a correlation.
    #[must_use]
    pub fn identity(windows: &[LagSpec]) -> Self {
        Self {
            best_correlation: Some(1.0),
            best_lag: 0,
            lag_unit: windows.first().map(|w| w.unit),
            lag_details: windows
                .iter()
                .map(|w| LagDetail {
                    lag_unit: w.unit,
                    lag_step: 0,
                    correlation: 1.0,
                })
                .collect(),
        }
    }

    /// The same result viewed from the reversed pair.
    ///
    /// Shifting the second series by `+k` is shifting the first by `-k`, so
    /// every step changes sign. Steps inside each window are reversed to stay
    /// ascending, windows keep their order, and the best step is picked again
    /// so ties resolve to the first step in that order.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        if self.lag_details.is_empty() {
            return Self {
                best_lag: -self.best_lag,
                ..self.clone()
            };
        }

        let mut lag_details = Vec::with_capacity(self.lag_details.len());
        let mut start = 0;
        for end in 1..=self.lag_details.len() {
            let window_ends = self.lag_details.get(end).is_none_or(|next| {
                let prev = &self.lag_details[end - 1];
                next.lag_unit != prev.lag_unit || next.lag_step <= prev.lag_step
            });
            if window_ends {
                lag_details.extend(self.lag_details[start..end].iter().rev().map(|d| LagDetail {
                    lag_step: -d.lag_step,
                    ..*d
                }));
                start = end;
            }
        }

        let mut best: Option<&LagDetail> = None;
        for d in &lag_details {
            if best.is_none_or(|b| d.correlation.abs() > b.correlation.abs()) {
                best = Some(d);
            }
        }
        let (best_correlation, best_lag, lag_unit) = match best {
            Some(d) => (Some(d.correlation), d.lag_step, Some(d.lag_unit)),
            None => (None, 0, None),
        };
        Self {
            best_correlation,
            best_lag,
            lag_unit,
            lag_details,
        }
    }

    /// Whether a correlation could be computed at all.
    #[must_use]
    pub const fn is_computable(&self) -> bool {
        self.best_correlation.is_some()
    }
}

impl Default for PairResult {
    fn default() -> Self {
        Self::empty()
    }
}

/// Key under which a pair is reported: `"{first} and {second}"`.
#[must_use]
pub fn pair_key(first: &str, second: &str) -> String {
    format!("{first} and {second}")
}

/// Split a pair key back into its two labels.
#[must_use]
pub fn split_pair_key(key: &str) -> Option<(&str, &str)> {
    key.split_once(" and ")
}

/// Shape of one normalized series as seen by reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// `{asset_id}_{attribute}` label.
    pub label: String,
    /// Canonical label of the inferred sampling interval.
    pub frequency: Option<String>,
    /// Number of samples after normalization.
    pub data_size: usize,
    /// First timestamp, in the reference timezone.
    pub start_date: Option<DateTime<FixedOffset>>,
    /// Last timestamp, in the reference timezone.
    pub end_date: Option<DateTime<FixedOffset>>,
}

/// Summary of a correlation request.
///
/// Carries the pair mapping, the series that took part, and any non-fatal
/// warnings encountered while fetching or normalizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CorrelationReport {
    /// Pair results keyed by [`pair_key`].
    pub correlations: BTreeMap<String, PairResult>,
    /// Series that were correlated, in request order.
    pub series: Vec<SeriesSummary>,
    /// Non-fatal issues encountered while building the report.
    pub warnings: Vec<LagcorrError>,
}
