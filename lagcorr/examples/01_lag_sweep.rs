use std::sync::Arc;

use lagcorr::{CorrelationRequest, Lagcorr};
use lagcorr_mock::MockSource;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=debug (build with --features tracing for engine spans)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    // 1. Build the orchestrator over the fixture source.
    let lc = Lagcorr::builder()
        .with_source(Arc::new(MockSource::new()))
        .build()?;

    // 2. Boiler and radiator temperatures, swept three hours either way plus
    //    a one-day window.
    let req = CorrelationRequest::from_json(
        r#"{
            "name": "boiler vs radiator",
            "assets": [
                {"asset_id": 1, "attribute_name": "temp"},
                {"asset_id": 2, "attribute_name": "temp"}
            ],
            "lags": [{"hours": 3, "days": 1}]
        }"#,
    )?;

    // 3. Correlate and print the matrix.
    let report = lc.correlate(&req).await?;
    for (pair, result) in &report.correlations {
        println!(
            "{pair}: best {:?} at {} {}",
            result.best_correlation,
            result.best_lag,
            result.lag_unit.map_or("-", |u| u.as_str()),
        );
    }
    for w in &report.warnings {
        println!("warning: {w}");
    }
    println!("{}", serde_json::to_string_pretty(&report.correlations)?);

    Ok(())
}
