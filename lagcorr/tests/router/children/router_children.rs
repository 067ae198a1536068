use lagcorr::{AssetSelection, LagcorrError};
use lagcorr_mock::{BOILER, EMPTY_PARENT, METER, MockBehavior, PLANT};

use crate::helpers::{dynamic_lagcorr, hourly, hours, mock_lagcorr, request};

#[tokio::test]
async fn children_are_correlated_whole() {
    let report = mock_lagcorr()
        .correlate_children(PLANT, &request(vec![], vec![hours(2)]))
        .await
        .unwrap();
    let labels: Vec<&str> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["1_flow", "1_temp", "2_temp", "3_power"]);
    assert_eq!(report.correlations.len(), 16);
    assert_eq!(report.correlations["1_temp and 2_temp"].best_lag, -1);
}

#[tokio::test]
async fn parent_selection_is_applied_to_each_child() {
    let template = request(vec![AssetSelection::attribute(PLANT, "temp")], vec![hours(2)]);
    let report = mock_lagcorr()
        .correlate_children(PLANT, &template)
        .await
        .unwrap();
    let labels: Vec<&str> = report.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["1_temp", "2_temp"]);
    assert_eq!(report.warnings, vec![LagcorrError::data_gap(METER, "temp")]);
    assert_eq!(report.correlations["2_temp and 1_temp"].best_lag, 1);
}

#[tokio::test]
async fn childless_and_unknown_parents_are_not_found() {
    let lc = mock_lagcorr();
    let template = request(vec![], vec![]);
    assert!(matches!(
        lc.correlate_children(EMPTY_PARENT, &template).await,
        Err(LagcorrError::NotFound { .. })
    ));
    assert!(matches!(
        lc.correlate_children(BOILER, &template).await,
        Err(LagcorrError::NotFound { .. })
    ));
}

#[tokio::test]
async fn hierarchy_comes_from_the_source() {
    let (lc, controller) = dynamic_lagcorr("tree");
    assert!(matches!(
        lc.correlate_children(7, &request(vec![], vec![])).await,
        Err(LagcorrError::Unsupported { .. })
    ));

    controller
        .set_children_behavior(7, MockBehavior::Return(vec![1, 2]))
        .await;
    controller
        .set_trend_behavior(1, MockBehavior::Return(hourly("x", 0, &[1.0, 2.0, 4.0])))
        .await;
    controller
        .set_trend_behavior(2, MockBehavior::Return(hourly("x", 0, &[2.0, 4.0, 8.0])))
        .await;
    let report = lc
        .correlate_children(7, &request(vec![], vec![]))
        .await
        .unwrap();
    assert_eq!(report.correlations["1_x and 2_x"].best_correlation, Some(1.0));
}
