use lagcorr::{AssetSelection, LagcorrError};
use lagcorr_mock::{BOILER, FAIL, MONTHLY, MockBehavior};

use crate::helpers::{dynamic_lagcorr, hourly, hours, mock_lagcorr, request};

#[tokio::test]
async fn failing_asset_and_missing_attribute_become_warnings() {
    let lc = mock_lagcorr();
    let req = request(
        vec![
            AssetSelection::attribute(BOILER, "temp"),
            AssetSelection::whole(FAIL),
            AssetSelection::attribute(BOILER, "pressure"),
        ],
        vec![hours(1)],
    );
    let report = lc.correlate(&req).await.unwrap();

    assert_eq!(report.warnings.len(), 2);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| matches!(w, LagcorrError::Source { provider, .. } if provider == "lagcorr-mock"))
    );
    assert!(report.warnings.contains(&LagcorrError::data_gap(BOILER, "pressure")));
    assert!(report.warnings.iter().all(|w| !w.is_fatal()));

    let keys: Vec<&str> = report.correlations.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["1_temp and 1_temp"]);
}

#[tokio::test]
async fn disjoint_ranges_are_null_for_every_lag() {
    let lc = mock_lagcorr();
    let req = request(
        vec![
            AssetSelection::attribute(BOILER, "temp"),
            AssetSelection::attribute(MONTHLY, "consumption"),
        ],
        vec![hours(3)],
    );
    let report = lc.correlate(&req).await.unwrap();
    for key in ["1_temp and 4_consumption", "4_consumption and 1_temp"] {
        let r = &report.correlations[key];
        assert_eq!(r.best_correlation, None);
        assert_eq!(r.best_lag, 0);
        assert_eq!(r.lag_unit, None);
        assert!(r.lag_details.is_empty());
    }
}

#[tokio::test]
async fn constant_and_short_series_have_no_correlation() {
    let (lc, controller) = dynamic_lagcorr("degenerate");
    controller
        .set_trend_behavior(1, MockBehavior::Return(hourly("x", 0, &[3.0, 3.0, 3.0, 3.0])))
        .await;
    controller
        .set_trend_behavior(2, MockBehavior::Return(hourly("x", 0, &[1.0, 2.0, 3.0, 4.0])))
        .await;
    controller
        .set_trend_behavior(3, MockBehavior::Return(hourly("x", 0, &[7.0])))
        .await;

    let req = request(
        vec![
            AssetSelection::attribute(1, "x"),
            AssetSelection::attribute(2, "x"),
            AssetSelection::attribute(3, "x"),
        ],
        vec![hours(1)],
    );
    let report = lc.correlate(&req).await.unwrap();

    assert_eq!(report.correlations["1_x and 1_x"].best_correlation, None);
    assert_eq!(report.correlations["3_x and 3_x"].best_correlation, None);
    assert_eq!(report.correlations["2_x and 2_x"].best_correlation, Some(1.0));
    assert_eq!(report.correlations["1_x and 2_x"].best_correlation, None);
    assert_eq!(report.correlations["2_x and 3_x"].best_correlation, None);
    assert!(report.correlations["2_x and 3_x"].lag_details.is_empty());
}

#[tokio::test]
async fn null_values_and_repeated_instants_are_cleaned() {
    let (lc, controller) = dynamic_lagcorr("dirty");
    let mut raw = hourly("x", 0, &[1.0, 2.0, 3.0, 4.0, 5.0]);
    // Restated sample: later value wins for the same instant.
    let restated = lagcorr::RawSample::new(raw[2].ts, [("x", Some(30.0))]);
    raw.push(restated);
    let gap = lagcorr::RawSample::new(raw[4].ts + chrono::TimeDelta::hours(1), [("x", None)]);
    raw.push(gap);
    raw.reverse();
    controller.set_trend_behavior(1, MockBehavior::Return(raw)).await;

    let report = lc
        .correlate(&request(vec![AssetSelection::attribute(1, "x")], vec![]))
        .await
        .unwrap();
    assert_eq!(report.series[0].data_size, 5);
}

#[tokio::test]
async fn differencing_applies_per_selection() {
    let (lc, controller) = dynamic_lagcorr("diff");
    controller
        .set_trend_behavior(1, MockBehavior::Return(hourly("x", 0, &[1.0, 4.0, 9.0, 16.0, 25.0])))
        .await;
    controller
        .set_trend_behavior(2, MockBehavior::Return(hourly("y", 1, &[2.0, 3.0, 4.0, 5.0])))
        .await;

    let req = request(
        vec![
            AssetSelection::attribute(1, "x").with_diff(true),
            AssetSelection::attribute(2, "y"),
        ],
        vec![],
    );
    let report = lc.correlate(&req).await.unwrap();
    assert_eq!(report.series[0].data_size, 4);
    assert_eq!(report.series[1].data_size, 4);
    // Differences of squares grow linearly, as does the second series.
    assert_eq!(report.correlations["1_x and 2_y"].best_correlation, Some(1.0));
}
