use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use lagcorr_core::TrendSource;
use lagcorr_types::{AlignmentPolicy, LagcorrConfig, LagcorrError};

/// Orchestrator that fetches, normalizes and correlates asset trends.
pub struct Lagcorr {
    pub(crate) source: Arc<dyn TrendSource>,
    pub(crate) cfg: LagcorrConfig,
}

/// Builder for constructing a `Lagcorr` orchestrator with custom configuration.
pub struct LagcorrBuilder {
    source: Option<Arc<dyn TrendSource>>,
    cfg: LagcorrConfig,
}

impl Default for LagcorrBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LagcorrBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts without a source; you must register one via [`Self::with_source`].
    /// - Defaults: `Europe/Berlin` reference timezone, nearest-tolerance alignment,
    ///   30s source timeout, no request deadline, parallel pair evaluation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            cfg: LagcorrConfig::default(),
        }
    }

    /// Register the trend source all fetches go through.
    ///
    /// Registering again replaces the previous source.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn TrendSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: LagcorrConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Set the timezone series are converted to.
    ///
    /// Behavior and trade-offs:
    /// - Day, month and year lags move the wall clock of this timezone, so the
    ///   choice decides how DST transitions and month ends shift samples.
    /// - Frequency inference looks at wall-clock strides in this timezone.
    #[must_use]
    pub const fn reference_timezone(mut self, tz: Tz) -> Self {
        self.cfg.reference_timezone = tz;
        self
    }

    /// Select how pairs are aligned before correlating.
    ///
    /// Behavior and trade-offs:
    /// - `NearestTolerance` keeps raw timestamps and drops unmatched samples.
    /// - `ResampleThenJoin` averages onto the coarser grid and forward-fills gaps;
    ///   smoother but can inflate correlation over long gaps.
    #[must_use]
    pub const fn alignment(mut self, policy: AlignmentPolicy) -> Self {
        self.cfg.alignment = policy;
        self
    }

    /// Set the timeout for a single source call.
    #[must_use]
    pub const fn source_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.source_timeout = timeout;
        self
    }

    /// Set an overall deadline for the fetch fan-out.
    ///
    /// When exceeded, the whole operation fails with `RequestTimeout`.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Set a deadline for starting pair computations.
    ///
    /// Behavior and trade-offs:
    /// - Checked before each pair starts; a pair already running is never interrupted.
    /// - If any pair misses the deadline the operation fails with `RequestTimeout`
    ///   rather than returning a partial matrix.
    #[must_use]
    pub const fn compute_deadline(mut self, deadline: Duration) -> Self {
        self.cfg.compute_deadline = Some(deadline);
        self
    }

    /// Toggle evaluation of pairs on the rayon worker pool.
    #[must_use]
    pub const fn parallel(mut self, yes: bool) -> Self {
        self.cfg.parallel = yes;
        self
    }

    /// Build the `Lagcorr` orchestrator.
    ///
    /// # Errors
    /// Returns `Configuration` if no source has been registered via [`Self::with_source`].
    pub fn build(self) -> Result<Lagcorr, LagcorrError> {
        let source = self.source.ok_or_else(|| {
            LagcorrError::config("no trend source registered; add one via with_source(...)")
        })?;
        Ok(Lagcorr {
            source,
            cfg: self.cfg,
        })
    }
}

/// Attach the source name to errors that do not carry one yet.
pub(crate) fn tag_err(provider: &str, e: LagcorrError) -> LagcorrError {
    match e {
        e @ (LagcorrError::NotFound { .. }
        | LagcorrError::Source { .. }
        | LagcorrError::SourceTimeout { .. }
        | LagcorrError::RequestTimeout { .. }
        | LagcorrError::Unsupported { .. }) => e,
        other => LagcorrError::source(provider, other.to_string()),
    }
}

impl Lagcorr {
    /// Wrap a source future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "lagcorr::core::source_call_with_timeout",
            skip(fut),
            fields(
                provider = provider,
                capability = capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn source_call_with_timeout<T, Fut>(
        provider: &'static str,
        capability: &'static str,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, LagcorrError>
    where
        Fut: core::future::Future<Output = Result<T, LagcorrError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(LagcorrError::source_timeout(provider, capability)))
    }

    /// Start building a new `Lagcorr` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use lagcorr::{AlignmentPolicy, Lagcorr};
    ///
    /// let lc = Lagcorr::builder()
    ///     .with_source(Arc::new(MySource::new()))
    ///     .reference_timezone(chrono_tz::Europe::Vienna)
    ///     .alignment(AlignmentPolicy::ResampleThenJoin)
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> LagcorrBuilder {
        LagcorrBuilder::new()
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &LagcorrConfig {
        &self.cfg
    }

    /// Name of the registered source.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }
}

/// Run `fut` under an optional deadline, mapping expiry to `RequestTimeout`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    capability: &'static str,
    fut: Fut,
) -> Result<T, LagcorrError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| LagcorrError::request_timeout(capability)),
        None => Ok(fut.await),
    }
}
