use lagcorr_core::{
    AlignedRow, CorrelationRequest, LagSweep, LagcorrError, PairResult, SeriesSummary,
};
use serde::Serialize;

use crate::Lagcorr;
use crate::router::aggregate::distinct_labels;

/// In-depth view of a single pair: the sweep result and the rows behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairAnalysis {
    /// Series that stayed put.
    pub first: SeriesSummary,
    /// Series that was shifted during the sweep.
    pub second: SeriesSummary,
    /// Sweep outcome for `first and second`.
    pub result: PairResult,
    /// Aligned rows at the best lag; empty when nothing was computable.
    pub rows: Vec<AlignedRow>,
    /// Non-fatal issues encountered while fetching or normalizing.
    pub warnings: Vec<LagcorrError>,
}

impl Lagcorr {
    /// Sweep exactly two series and return the aligned rows at the best lag.
    ///
    /// # Errors
    /// Returns `Configuration` unless the request holds exactly two selections
    /// that resolve to exactly two series, and `RequestTimeout` when the fetch
    /// fan-out exceeds the request deadline.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "lagcorr::analyze_pair", skip(self, req))
    )]
    pub async fn analyze_pair(&self, req: &CorrelationRequest) -> Result<PairAnalysis, LagcorrError> {
        req.validate()?;
        req.require_selections(2)?;
        let fetched = self.fetch_selections(req).await?;
        let (series, dupes) = distinct_labels(&fetched.series);
        let [first, second] = &series[..] else {
            return Err(LagcorrError::config(format!(
                "pair analysis needs exactly two series, got {}",
                series.len()
            )));
        };

        let (result, rows) = LagSweep::new(&req.lags, self.cfg.alignment).run_with_rows(first, second);
        let mut warnings = fetched.warnings;
        warnings.extend(dupes);
        Ok(PairAnalysis {
            first: first.summary(),
            second: second.summary(),
            result,
            rows,
            warnings,
        })
    }
}
