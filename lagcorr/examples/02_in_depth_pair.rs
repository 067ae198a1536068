use std::sync::Arc;

use lagcorr::{AlignmentPolicy, AssetSelection, CorrelationRequest, LagSpec, LagUnit, Lagcorr};
use lagcorr_mock::{BOILER, METER, MockSource};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    // Hourly boiler against a quarter-hourly meter, averaged onto the hourly grid.
    let lc = Lagcorr::builder()
        .with_source(Arc::new(MockSource::new()))
        .alignment(AlignmentPolicy::ResampleThenJoin)
        .build()?;

    let req = CorrelationRequest {
        assets: vec![
            AssetSelection::attribute(BOILER, "flow"),
            AssetSelection::attribute(METER, "power").with_diff(true),
        ],
        lags: vec![LagSpec::new(LagUnit::Minutes, 60)],
        ..CorrelationRequest::default()
    };

    let analysis = lc.analyze_pair(&req).await?;
    println!(
        "{} vs {}: {:?} at {} {:?}",
        analysis.first.label,
        analysis.second.label,
        analysis.result.best_correlation,
        analysis.result.best_lag,
        analysis.result.lag_unit,
    );
    for row in &analysis.rows {
        println!("{}  {:>8.3}  {:>8.3}", row.ts, row.a, row.b);
    }

    Ok(())
}
