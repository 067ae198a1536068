//! The data-fetch seam between the engine and an asset-data backend.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;

use crate::series::RawSample;
use lagcorr_types::LagcorrError;

/// Time bounds of a trend fetch, in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Inclusive lower bound; `None` means from the beginning of the record.
    pub start: Option<DateTime<Tz>>,
    /// Inclusive upper bound.
    pub end: DateTime<Tz>,
}

impl FetchWindow {
    /// Resolve optional request bounds in `tz`; a missing end means now.
    #[must_use]
    pub fn resolve(
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
        tz: Tz,
    ) -> Self {
        Self {
            start: start.map(|s| s.with_timezone(&tz)),
            end: end.map_or_else(|| Utc::now().with_timezone(&tz), |e| e.with_timezone(&tz)),
        }
    }

    /// Whether `ts` falls inside the window.
    #[must_use]
    pub fn contains(&self, ts: &DateTime<FixedOffset>) -> bool {
        self.start.is_none_or(|s| *ts >= s) && *ts <= self.end
    }
}

/// Backend that serves raw attribute trends for assets.
///
/// Implementations own their own clients; the orchestrator holds one
/// explicit handle and never reaches for global state. Chunked or paginated
/// fetching is the implementation's business: `trend` returns the whole
/// window, in any order, possibly with repeated instants.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Stable name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Raw attribute samples of `asset_id` within `window`.
    ///
    /// # Errors
    /// Returns a source-tagged error when the backend call fails, or
    /// `NotFound` for unknown assets.
    async fn trend(&self, asset_id: i64, window: &FetchWindow)
    -> Result<Vec<RawSample>, LagcorrError>;

    /// Child assets of `asset_id`.
    ///
    /// # Errors
    /// The default implementation reports the capability as unsupported.
    async fn children(&self, asset_id: i64) -> Result<Vec<i64>, LagcorrError> {
        let _ = asset_id;
        Err(LagcorrError::unsupported("children"))
    }
}
