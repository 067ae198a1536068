use lagcorr::{AssetSelection, LagDetail, LagUnit, LagcorrError};

use crate::helpers::{dynamic_lagcorr, hours, leading_pair, request};

#[tokio::test]
async fn leading_series_is_found_one_hour_back() {
    let (lc, controller) = dynamic_lagcorr("scenario");
    leading_pair(&controller).await;

    let req = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(2, "x")],
        vec![hours(2)],
    );
    let report = lc.correlate(&req).await.unwrap();
    assert!(report.warnings.is_empty());

    let forward = &report.correlations["1_x and 2_x"];
    assert_eq!(forward.best_correlation, Some(1.0));
    assert_eq!(forward.best_lag, -1);
    assert_eq!(forward.lag_unit, Some(LagUnit::Hours));
    let steps: Vec<i64> = forward.lag_details.iter().map(|d| d.lag_step).collect();
    assert_eq!(steps, vec![-2, -1, 0, 1, 2]);
    assert!(forward.lag_details.iter().all(|d| (-1.0..=1.0).contains(&d.correlation)));
    assert_eq!(
        forward.lag_details[1],
        LagDetail {
            lag_unit: LagUnit::Hours,
            lag_step: -1,
            correlation: 1.0
        }
    );

    let backward = &report.correlations["2_x and 1_x"];
    assert_eq!(backward.best_correlation, forward.best_correlation);
    assert_eq!(backward.best_lag, 1);
    let steps: Vec<i64> = backward.lag_details.iter().map(|d| d.lag_step).collect();
    assert_eq!(steps, vec![-2, -1, 0, 1, 2]);
}

#[tokio::test]
async fn self_pairs_are_identity() {
    let (lc, controller) = dynamic_lagcorr("self");
    leading_pair(&controller).await;

    let req = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(2, "x")],
        vec![hours(2)],
    );
    let report = lc.correlate(&req).await.unwrap();
    assert_eq!(report.correlations.len(), 4);
    for label in ["1_x", "2_x"] {
        let own = &report.correlations[&format!("{label} and {label}")];
        assert_eq!(own.best_correlation, Some(1.0));
        assert_eq!(own.best_lag, 0);
        assert_eq!(own.lag_details.len(), 1);
        assert_eq!(own.lag_details[0].lag_step, 0);
    }
}

#[tokio::test]
async fn no_lags_means_a_single_unshifted_score() {
    let (lc, controller) = dynamic_lagcorr("unlagged");
    leading_pair(&controller).await;

    let req = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(2, "x")],
        vec![],
    );
    let report = lc.correlate(&req).await.unwrap();
    let r = &report.correlations["1_x and 2_x"];
    assert!(r.best_correlation.is_some());
    assert_eq!(r.best_lag, 0);
    assert_eq!(r.lag_unit, None);
    assert!(r.lag_details.is_empty());
}

#[tokio::test]
async fn summaries_describe_each_series() {
    let (lc, controller) = dynamic_lagcorr("summary");
    leading_pair(&controller).await;

    let req = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(2, "x")],
        vec![hours(1)],
    );
    let report = lc.correlate(&req).await.unwrap();
    let labels: Vec<&str> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["1_x", "2_x"]);
    assert!(report.series.iter().all(|s| s.data_size == 5));
    assert!(
        report
            .series
            .iter()
            .all(|s| s.frequency.as_deref() == Some("1h"))
    );
}

#[tokio::test]
async fn invalid_requests_fail_before_fetching() {
    let (lc, controller) = dynamic_lagcorr("invalid");

    let empty = request(vec![], vec![hours(1)]);
    assert!(matches!(
        lc.correlate(&empty).await,
        Err(LagcorrError::Configuration(_))
    ));

    let repeated = request(
        vec![AssetSelection::attribute(1, "x"), AssetSelection::attribute(1, "x")],
        vec![],
    );
    assert!(matches!(
        lc.correlate(&repeated).await,
        Err(LagcorrError::Configuration(_))
    ));
    assert!(controller.get_trend_requests().await.is_empty());
}

#[tokio::test]
async fn each_asset_is_fetched_once_with_the_request_window() {
    let (lc, controller) = dynamic_lagcorr("window");
    leading_pair(&controller).await;

    let start = crate::helpers::at(2024, 1, 1, 0);
    let end = crate::helpers::at(2024, 1, 2, 0);
    let req = lagcorr::CorrelationRequest {
        start_time: Some(start),
        end_time: Some(end),
        ..request(
            vec![
                AssetSelection::attribute(1, "x"),
                AssetSelection::whole(1),
                AssetSelection::attribute(2, "x"),
            ],
            vec![],
        )
    };
    let report = lc.correlate(&req).await.unwrap();

    let log = controller.get_trend_requests().await;
    let mut ids: Vec<i64> = log.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);
    for (_, window) in &log {
        assert_eq!(window.start.map(|s| s.fixed_offset()), Some(start));
        assert_eq!(window.end.fixed_offset(), end);
    }

    // The whole-asset selection repeats "1_x" and is dropped with a warning.
    assert_eq!(report.series.len(), 2);
    assert!(matches!(report.warnings.as_slice(), [LagcorrError::Data(_)]));
}
