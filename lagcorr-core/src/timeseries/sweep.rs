use crate::series::{AlignedRow, NormalizedSeries, Point};
use crate::timeseries::merge::MergePlan;
use crate::timeseries::resample::{Grid, align_resampled};
use crate::timeseries::shift::shift_points;
use crate::timeseries::stats::{correlate_rows, round4};
use lagcorr_types::{AlignmentPolicy, LagDetail, LagSpec, LagUnit, LagcorrError, PairResult};

/// Alignment of one pair, planned once from the unshifted series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairAlignment {
    plan: MergePlan,
    grid: Option<Grid>,
}

impl PairAlignment {
    /// Plan the alignment of `a` and `b` under `policy`.
    #[must_use]
    pub fn new(policy: AlignmentPolicy, a: &NormalizedSeries, b: &NormalizedSeries) -> Self {
        let grid = match policy {
            AlignmentPolicy::ResampleThenJoin => Grid::for_pair(a.frequency(), b.frequency()),
            _ => None,
        };
        Self {
            plan: MergePlan::for_pair(a.frequency(), b.frequency()),
            grid,
        }
    }

    /// Align two sample slices; the resample grid falls back to a nearest join
    /// when no fixed interval is known.
    #[must_use]
    pub fn align(&self, a: &[Point], b: &[Point]) -> Vec<AlignedRow> {
        match self.grid {
            Some(grid) => align_resampled(a, b, grid),
            None => self.plan.align(a, b),
        }
    }
}

/// Lag-sweep correlator over a fixed list of windows.
///
/// Every step shifts the second series while the first stays put, so a
/// negative best lag means the second series leads.
#[derive(Debug, Clone, Copy)]
pub struct LagSweep<'w> {
    windows: &'w [LagSpec],
    policy: AlignmentPolicy,
}

struct Candidate {
    correlation: f64,
    lag: i64,
    unit: LagUnit,
    rows: Vec<AlignedRow>,
}

impl<'w> LagSweep<'w> {
    /// Build a sweep over `windows` in request order.
    #[must_use]
    pub const fn new(windows: &'w [LagSpec], policy: AlignmentPolicy) -> Self {
        Self { windows, policy }
    }

    /// Correlate `a` with `b` across every window step.
    #[must_use]
    pub fn run(&self, a: &NormalizedSeries, b: &NormalizedSeries) -> PairResult {
        self.run_with_rows(a, b).0
    }

    /// Like [`LagSweep::run`], also returning the aligned rows at the best lag.
    #[must_use]
    pub fn run_with_rows(
        &self,
        a: &NormalizedSeries,
        b: &NormalizedSeries,
    ) -> (PairResult, Vec<AlignedRow>) {
        let alignment = PairAlignment::new(self.policy, a, b);

        if self.windows.is_empty() {
            let rows = alignment.align(a.samples(), b.samples());
            return match score(&rows) {
                Ok(r) => (
                    PairResult {
                        best_correlation: Some(r),
                        ..PairResult::empty()
                    },
                    rows,
                ),
                Err(_e) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(a = a.label(), b = b.label(), error = %_e, "pair not computable");
                    (PairResult::empty(), Vec::new())
                }
            };
        }

        let mut details = Vec::new();
        let mut best: Option<Candidate> = None;
        for window in self.windows {
            for step in window.steps() {
                let shifted = shift_points(b.samples(), window.unit, step);
                let rows = alignment.align(a.samples(), &shifted);
                let Ok(r) = score(&rows) else {
                    continue;
                };
                details.push(LagDetail {
                    lag_unit: window.unit,
                    lag_step: step,
                    correlation: r,
                });
                // Comparison on rounded values; the first candidate keeps ties.
                if best.as_ref().is_none_or(|c| r.abs() > c.correlation.abs()) {
                    best = Some(Candidate {
                        correlation: r,
                        lag: step,
                        unit: window.unit,
                        rows,
                    });
                }
            }
        }

        match best {
            Some(c) => (
                PairResult {
                    best_correlation: Some(c.correlation),
                    best_lag: c.lag,
                    lag_unit: Some(c.unit),
                    lag_details: details,
                },
                c.rows,
            ),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(a = a.label(), b = b.label(), "no lag step produced a correlation");
                (PairResult::empty(), Vec::new())
            }
        }
    }
}

fn score(rows: &[AlignedRow]) -> Result<f64, LagcorrError> {
    correlate_rows(rows).map(round4)
}
