use lagcorr::{
    AlignmentPolicy, AssetSelection, CorrelationRequest, LagSpec, LagUnit, pair_key,
};
use lagcorr_mock::{BOILER, METER, RADIATOR};

use crate::helpers::{at, hours, mock_builder, mock_lagcorr, request};

fn plant_request() -> CorrelationRequest {
    request(
        vec![
            AssetSelection::whole(BOILER),
            AssetSelection::attribute(RADIATOR, "temp"),
            AssetSelection::attribute(METER, "power"),
        ],
        vec![hours(3), LagSpec::new(LagUnit::Minutes, 30)],
    )
}

#[tokio::test]
async fn radiator_follows_boiler_by_one_hour() {
    let report = mock_lagcorr()
        .correlate(&request(
            vec![
                AssetSelection::attribute(BOILER, "temp"),
                AssetSelection::attribute(RADIATOR, "temp"),
            ],
            vec![hours(3)],
        ))
        .await
        .unwrap();
    let r = &report.correlations["1_temp and 2_temp"];
    assert_eq!(r.best_correlation, Some(1.0));
    assert_eq!(r.best_lag, -1);
    assert_eq!(r.lag_details.len(), 7);
}

#[tokio::test]
async fn matrix_is_symmetric() {
    let report = mock_lagcorr().correlate(&plant_request()).await.unwrap();
    let labels: Vec<String> = report.series.iter().map(|s| s.label.clone()).collect();
    assert_eq!(labels, vec!["1_flow", "1_temp", "2_temp", "3_power"]);
    assert_eq!(report.correlations.len(), labels.len() * labels.len());

    for a in &labels {
        for b in &labels {
            let ab = &report.correlations[&pair_key(a, b)];
            let ba = &report.correlations[&pair_key(b, a)];
            assert_eq!(
                ab.best_correlation.map(f64::abs),
                ba.best_correlation.map(f64::abs),
                "{a} / {b}"
            );
            assert_eq!(&ba.mirrored(), ab, "{a} / {b}");
            assert_eq!(ab.lag_details.len(), ba.lag_details.len());
            if let Some(r) = ab.best_correlation {
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }
}

#[tokio::test]
async fn lag_steps_stay_inside_their_windows() {
    let report = mock_lagcorr().correlate(&plant_request()).await.unwrap();
    for result in report.correlations.values() {
        for d in &result.lag_details {
            match d.lag_unit {
                LagUnit::Hours => assert!((-3..=3).contains(&d.lag_step)),
                LagUnit::Minutes => assert!((-30..=30).contains(&d.lag_step)),
                other => panic!("unexpected unit {other:?}"),
            }
            assert_eq!((d.correlation * 1e4).round() / 1e4, d.correlation);
        }
    }
}

#[tokio::test]
async fn parallel_and_sequential_agree() {
    let par = mock_builder().parallel(true).build().unwrap();
    let seq = mock_builder().parallel(false).build().unwrap();
    let req = plant_request();
    let a = par.correlate(&req).await.unwrap();
    let b = seq.correlate(&req).await.unwrap();
    assert_eq!(a.correlations, b.correlations);
}

#[tokio::test]
async fn resampled_alignment_correlates_mixed_rates() {
    let lc = mock_builder()
        .alignment(AlignmentPolicy::ResampleThenJoin)
        .build()
        .unwrap();
    let report = lc
        .correlate(&request(
            vec![
                AssetSelection::attribute(BOILER, "temp"),
                AssetSelection::attribute(METER, "power"),
            ],
            vec![],
        ))
        .await
        .unwrap();
    let r = report.correlations["1_temp and 3_power"]
        .best_correlation
        .unwrap();
    assert!((-1.0..=1.0).contains(&r));
    let meter = &report.series[1];
    assert_eq!(meter.frequency.as_deref(), Some("15min"));
}

#[tokio::test]
async fn request_window_bounds_the_series() {
    let req = CorrelationRequest {
        start_time: Some(at(2024, 1, 1, 10)),
        end_time: Some(at(2024, 1, 1, 19)),
        ..request(vec![AssetSelection::attribute(BOILER, "temp")], vec![])
    };
    let report = mock_lagcorr().correlate(&req).await.unwrap();
    let s = &report.series[0];
    assert_eq!(s.data_size, 10);
    assert_eq!(s.start_date, Some(at(2024, 1, 1, 10)));
    assert_eq!(s.end_date, Some(at(2024, 1, 1, 19)));
}

#[tokio::test]
async fn report_serializes_with_wire_field_names() {
    let report = mock_lagcorr()
        .correlate(&request(
            vec![
                AssetSelection::attribute(BOILER, "temp"),
                AssetSelection::attribute(RADIATOR, "temp"),
            ],
            vec![hours(1)],
        ))
        .await
        .unwrap();
    let json = serde_json::to_value(&report).unwrap();
    let pair = &json["correlations"]["1_temp and 2_temp"];
    assert_eq!(pair["best_correlation"], serde_json::json!(1.0));
    assert_eq!(pair["best_lag"], serde_json::json!(-1));
    assert_eq!(pair["lag_unit"], serde_json::json!("hours"));
    assert!(pair["lag_details"].is_array());
}
