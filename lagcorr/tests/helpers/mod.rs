// Shared fixtures for orchestrator tests: `use crate::helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use lagcorr::{
    AssetSelection, CorrelationRequest, LagSpec, LagUnit, Lagcorr, LagcorrBuilder, RawSample,
    TrendSource,
};
use lagcorr_mock::{DynamicMockController, DynamicMockSource, MockBehavior, MockSource};

/// `+01:00`, the winter offset of the reference timezone.
pub fn cet() -> FixedOffset {
    FixedOffset::east_opt(3_600).unwrap()
}

/// Wall-clock instant in `+01:00` for readability in tests.
pub fn at(y: i32, m: u32, d: u32, hh: u32) -> DateTime<FixedOffset> {
    cet().with_ymd_and_hms(y, m, d, hh, 0, 0).unwrap()
}

/// Hourly samples of one field starting `offset_h` hours after 2024-01-01T00:00+01:00.
pub fn hourly(field: &str, offset_h: i64, values: &[f64]) -> Vec<RawSample> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let ts = at(2024, 1, 1, 0) + TimeDelta::hours(offset_h + i as i64);
            RawSample::new(ts, [(field, Some(*v))])
        })
        .collect()
}

/// Builder preloaded with the fixture-backed mock source.
pub fn mock_builder() -> LagcorrBuilder {
    Lagcorr::builder().with_source(Arc::new(MockSource::new()))
}

/// Orchestrator over the fixture-backed mock source.
pub fn mock_lagcorr() -> Lagcorr {
    mock_builder().build().unwrap()
}

/// Orchestrator over a dynamic mock plus its controller.
pub fn dynamic_lagcorr(name: &'static str) -> (Lagcorr, DynamicMockController) {
    let (source, controller) = DynamicMockSource::new_with_controller(name);
    (with_source(source), controller)
}

pub fn with_source(source: Arc<dyn TrendSource>) -> Lagcorr {
    Lagcorr::builder().with_source(source).build().unwrap()
}

/// Hourly `[1..=5]` on asset 1 and the same values one hour later on asset 2.
pub async fn leading_pair(controller: &DynamicMockController) {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0];
    controller
        .set_trend_behavior(1, MockBehavior::Return(hourly("x", 0, &values)))
        .await;
    controller
        .set_trend_behavior(2, MockBehavior::Return(hourly("x", 1, &values)))
        .await;
}

pub fn request(assets: Vec<AssetSelection>, lags: Vec<LagSpec>) -> CorrelationRequest {
    CorrelationRequest {
        assets,
        lags,
        ..CorrelationRequest::default()
    }
}

pub const fn hours(n: u32) -> LagSpec {
    LagSpec::new(LagUnit::Hours, n)
}
