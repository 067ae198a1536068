use lagcorr_core::{CorrelationReport, CorrelationRequest, LagcorrError};

use crate::Lagcorr;

impl Lagcorr {
    /// Correlate every pair of series selected by `req`.
    ///
    /// Behavior and trade-offs:
    /// - The request is validated before anything is fetched.
    /// - Assets are fetched concurrently; a failing asset or a missing attribute
    ///   becomes a warning on the report rather than an error.
    /// - Pairs are evaluated on a blocking thread, on the rayon pool when
    ///   `parallel` is enabled, so the async runtime is not stalled by the sweep.
    /// - Pairs without enough overlap are reported with a null correlation.
    ///
    /// # Errors
    /// Returns `Configuration` for an invalid request, `RequestTimeout` when the
    /// fetch fan-out or the compute deadline is exceeded.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lagcorr::correlate",
            skip(self, req),
            fields(
                request = req.name.as_deref().unwrap_or(""),
                selections = req.assets.len(),
                windows = req.lags.len(),
            ),
        )
    )]
    pub async fn correlate(&self, req: &CorrelationRequest) -> Result<CorrelationReport, LagcorrError> {
        req.validate()?;
        let fetched = self.fetch_selections(req).await?;

        let aggregator = self.aggregator(&req.lags);
        let series = fetched.series;
        let mut report = tokio::task::spawn_blocking(move || aggregator.report(&series))
            .await
            .map_err(|e| LagcorrError::Other(format!("correlation task failed: {e}")))??;

        let mut warnings = fetched.warnings;
        warnings.append(&mut report.warnings);
        report.warnings = warnings;
        Ok(report)
    }
}
