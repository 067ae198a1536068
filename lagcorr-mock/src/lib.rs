use std::time::Duration;

use async_trait::async_trait;
use lagcorr_core::{FetchWindow, LagcorrError, RawSample, TrendSource};

mod dynamic;
mod fixtures;

pub use dynamic::{DynamicMockController, DynamicMockSource, MockBehavior};
pub use fixtures::hierarchy::{EMPTY_PARENT, PLANT};
pub use fixtures::trends::{BOILER, METER, MONTHLY, RADIATOR};

/// Asset id whose trend call always fails.
pub const FAIL: i64 = 500;
/// Asset id whose trend call stalls before answering with boiler data.
pub const SLOW: i64 = 408;

/// Mock trend source for CI-safe examples. Provides deterministic data from static fixtures.
pub struct MockSource;

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_stall(asset_id: i64, capability: &'static str) -> Result<(), LagcorrError> {
        match asset_id {
            FAIL => Err(LagcorrError::source(
                "lagcorr-mock",
                format!("forced failure: {capability}"),
            )),
            SLOW => {
                // Short enough for tests, long enough to trip a tight source timeout.
                tokio::time::sleep(Duration::from_millis(200)).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl TrendSource for MockSource {
    fn name(&self) -> &'static str {
        "lagcorr-mock"
    }

    async fn trend(
        &self,
        asset_id: i64,
        window: &FetchWindow,
    ) -> Result<Vec<RawSample>, LagcorrError> {
        Self::maybe_fail_or_stall(asset_id, "trend").await?;
        let lookup = if asset_id == SLOW { BOILER } else { asset_id };
        let raw = fixtures::trends::by_asset(lookup)
            .ok_or_else(|| LagcorrError::not_found(format!("trend for asset {asset_id}")))?;
        Ok(raw.into_iter().filter(|s| window.contains(&s.ts)).collect())
    }

    async fn children(&self, asset_id: i64) -> Result<Vec<i64>, LagcorrError> {
        fixtures::hierarchy::children_of(asset_id)
            .ok_or_else(|| LagcorrError::not_found(format!("children of asset {asset_id}")))
    }
}
