use std::sync::Arc;
use std::time::Duration;

use lagcorr::{CorrelationRequest, LagSpec, LagUnit, Lagcorr};
use lagcorr_mock::{MockSource, PLANT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let lc = Lagcorr::builder()
        .with_source(Arc::new(MockSource::new()))
        .request_timeout(Duration::from_secs(5))
        .parallel(true)
        .build()?;

    // Every attribute of every child of the plant, two hours either way.
    let template = CorrelationRequest {
        lags: vec![LagSpec::new(LagUnit::Hours, 2)],
        ..CorrelationRequest::default()
    };
    let report = lc.correlate_children(PLANT, &template).await?;

    for s in &report.series {
        println!(
            "{:<10} {:>4} samples, every {}",
            s.label,
            s.data_size,
            s.frequency.as_deref().unwrap_or("?"),
        );
    }
    for (pair, result) in &report.correlations {
        if let Some(r) = result.best_correlation {
            println!("{pair}: {r:+.4} at {}", result.best_lag);
        }
    }

    Ok(())
}
