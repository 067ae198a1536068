use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::time::{Duration, Instant};

use lagcorr_core::{
    AlignmentPolicy, CorrelationReport, LagSpec, LagSweep, LagcorrError, NormalizedSeries,
    PairResult, pair_key,
};
use rayon::prelude::*;

use crate::Lagcorr;

/// Builds the full pair matrix for a set of normalized series.
///
/// Behavior and trade-offs:
/// - Each unordered pair is swept once; the reversed key receives the mirrored
///   result, so both orientations always agree on the best correlation.
/// - Self pairs are not swept: a series with at least two samples and some
///   variance gets the identity result, anything else the empty one.
/// - With `parallel` enabled, pairs run on the rayon pool. Inputs are only read,
///   and results are merged after the join, so the output is identical to a
///   sequential run.
/// - The optional deadline is checked before a pair starts. A pair that is
///   already running finishes; if any pair could not start in time the whole
///   matrix is rejected with `RequestTimeout`.
#[derive(Debug, Clone)]
pub struct CorrelationAggregator {
    windows: Vec<LagSpec>,
    policy: AlignmentPolicy,
    parallel: bool,
    deadline: Option<Duration>,
}

impl CorrelationAggregator {
    /// Aggregator sweeping `windows` with `policy`; sequential, no deadline.
    #[must_use]
    pub const fn new(windows: Vec<LagSpec>, policy: AlignmentPolicy) -> Self {
        Self {
            windows,
            policy,
            parallel: false,
            deadline: None,
        }
    }

    /// Toggle evaluation on the rayon pool.
    #[must_use]
    pub const fn parallel(mut self, yes: bool) -> Self {
        self.parallel = yes;
        self
    }

    /// Set a deadline for starting pair computations.
    #[must_use]
    pub const fn deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Sweep windows in evaluation order.
    #[must_use]
    pub fn windows(&self) -> &[LagSpec] {
        &self.windows
    }

    /// Correlate every ordered pair of `series`, self pairs included.
    ///
    /// Labels are expected to be distinct; a repeated label overwrites the
    /// entries of the earlier series.
    ///
    /// # Errors
    /// Returns `RequestTimeout { capability: "correlate" }` when the deadline
    /// elapsed before every pair was started.
    pub fn aggregate(
        &self,
        series: &[NormalizedSeries],
    ) -> Result<BTreeMap<String, PairResult>, LagcorrError> {
        let started = Instant::now();
        let n = series.len();
        let pairs: Vec<(usize, usize)> = (0..n).flat_map(|i| (i..n).map(move |j| (i, j))).collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            series = n,
            pairs = pairs.len(),
            parallel = self.parallel,
            "correlating pairs"
        );

        let eval = |&(i, j): &(usize, usize)| -> Option<(usize, usize, PairResult)> {
            if self.deadline.is_some_and(|d| started.elapsed() >= d) {
                return None;
            }
            let result = if i == j {
                self_pair(&series[i], &self.windows)
            } else {
                LagSweep::new(&self.windows, self.policy).run(&series[i], &series[j])
            };
            Some((i, j, result))
        };

        let evaluated: Vec<Option<(usize, usize, PairResult)>> = if self.parallel {
            pairs.par_iter().map(eval).collect()
        } else {
            pairs.iter().map(eval).collect()
        };

        let mut out = BTreeMap::new();
        for slot in evaluated {
            let Some((i, j, result)) = slot else {
                return Err(LagcorrError::request_timeout("correlate"));
            };
            let (a, b) = (series[i].label(), series[j].label());
            if i != j {
                out.insert(pair_key(b, a), result.mirrored());
            }
            out.insert(pair_key(a, b), result);
        }
        Ok(out)
    }

    /// Correlate `series` and wrap the matrix into a report.
    ///
    /// Series whose label was already seen are skipped with a `Data` warning.
    ///
    /// # Errors
    /// Propagates the deadline error of [`Self::aggregate`].
    pub fn report(&self, series: &[NormalizedSeries]) -> Result<CorrelationReport, LagcorrError> {
        let (series, warnings) = distinct_labels(series);
        let correlations = self.aggregate(&series)?;
        Ok(CorrelationReport {
            correlations,
            series: series.iter().map(NormalizedSeries::summary).collect(),
            warnings,
        })
    }
}

fn self_pair(series: &NormalizedSeries, windows: &[LagSpec]) -> PairResult {
    if series.is_degenerate() {
        PairResult::empty()
    } else {
        PairResult::identity(windows)
    }
}

/// Keep the first series for every label, reporting the rest as warnings.
pub(crate) fn distinct_labels(
    series: &[NormalizedSeries],
) -> (Cow<'_, [NormalizedSeries]>, Vec<LagcorrError>) {
    let mut seen = HashSet::new();
    let repeated: Vec<usize> = series
        .iter()
        .enumerate()
        .filter(|(_, s)| !seen.insert(s.label()))
        .map(|(i, _)| i)
        .collect();
    if repeated.is_empty() {
        return (Cow::Borrowed(series), Vec::new());
    }

    let mut warnings = Vec::with_capacity(repeated.len());
    let mut kept = Vec::with_capacity(series.len() - repeated.len());
    for (i, s) in series.iter().enumerate() {
        if repeated.contains(&i) {
            #[cfg(feature = "tracing")]
            tracing::warn!(label = s.label(), "duplicate series label; keeping first");
            warnings.push(LagcorrError::Data(format!(
                "duplicate series label '{}'; keeping the first occurrence",
                s.label()
            )));
        } else {
            kept.push(s.clone());
        }
    }
    (Cow::Owned(kept), warnings)
}

impl Lagcorr {
    /// Aggregator configured from this orchestrator's settings.
    #[must_use]
    pub fn aggregator(&self, windows: &[LagSpec]) -> CorrelationAggregator {
        CorrelationAggregator::new(windows.to_vec(), self.cfg.alignment)
            .parallel(self.cfg.parallel)
            .deadline(self.cfg.compute_deadline)
    }

    /// Correlate already normalized series without touching the source.
    ///
    /// # Errors
    /// Returns `RequestTimeout { capability: "correlate" }` if the configured
    /// compute deadline elapsed before every pair was started.
    pub fn correlate_series(
        &self,
        series: &[NormalizedSeries],
        windows: &[LagSpec],
    ) -> Result<CorrelationReport, LagcorrError> {
        self.aggregator(windows).report(series)
    }
}
