use std::time::Duration;

use lagcorr::{AssetSelection, LagcorrError};
use lagcorr_mock::{BOILER, DynamicMockSource, MockBehavior, SLOW};

use crate::helpers::{hourly, hours, mock_builder, request};

#[tokio::test(start_paused = true)]
async fn slow_source_call_times_out_into_a_warning() {
    let lc = mock_builder()
        .source_timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let req = request(
        vec![
            AssetSelection::attribute(BOILER, "temp"),
            AssetSelection::attribute(SLOW, "temp"),
        ],
        vec![hours(1)],
    );
    let report = lc.correlate(&req).await.unwrap();

    assert_eq!(
        report.warnings,
        vec![LagcorrError::source_timeout("lagcorr-mock", "trend")]
    );
    assert_eq!(report.series.len(), 1);
    assert!(report.correlations.contains_key("1_temp and 1_temp"));
}

#[tokio::test(start_paused = true)]
async fn slow_source_within_timeout_is_served() {
    let lc = mock_builder()
        .source_timeout(Duration::from_secs(1))
        .build()
        .unwrap();
    let req = request(
        vec![
            AssetSelection::attribute(BOILER, "temp"),
            AssetSelection::attribute(SLOW, "temp"),
        ],
        vec![],
    );
    let report = lc.correlate(&req).await.unwrap();
    assert!(report.warnings.is_empty());
    assert_eq!(report.correlations["1_temp and 408_temp"].best_correlation, Some(1.0));
}

#[tokio::test(start_paused = true)]
async fn hanging_fan_out_hits_the_request_deadline() {
    let (source, controller) = DynamicMockSource::new_with_controller("hang");
    controller.set_trend_behavior(1, MockBehavior::Hang).await;
    controller
        .set_trend_behavior(2, MockBehavior::Return(hourly("x", 0, &[1.0, 2.0, 3.0])))
        .await;
    let lc = lagcorr::Lagcorr::builder()
        .with_source(source)
        .request_timeout(Duration::from_millis(20))
        .build()
        .unwrap();

    let req = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(2, "x")],
        vec![],
    );
    match lc.correlate(&req).await {
        Err(LagcorrError::RequestTimeout { capability }) => assert_eq!(capability, "trend"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn compute_deadline_rejects_the_whole_matrix() {
    let lc = mock_builder()
        .compute_deadline(Duration::ZERO)
        .build()
        .unwrap();
    let req = request(vec![AssetSelection::attribute(BOILER, "temp")], vec![hours(1)]);
    match lc.correlate(&req).await {
        Err(LagcorrError::RequestTimeout { capability }) => assert_eq!(capability, "correlate"),
        other => panic!("unexpected: {other:?}"),
    }
}
