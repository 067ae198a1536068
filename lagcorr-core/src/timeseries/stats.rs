use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::series::AlignedRow;
use lagcorr_types::LagcorrError;

/// Pearson correlation coefficient of two equally long columns.
///
/// Two-pass: means first, then covariance over the product of standard
/// deviations. The result is clamped to `[-1, 1]`.
///
/// # Errors
/// - `InsufficientOverlap` with fewer than two rows (or unequal lengths).
/// - `DegenerateVariance` when either column is constant.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Result<f64, LagcorrError> {
    let rows = xs.len().min(ys.len());
    if rows < 2 || xs.len() != ys.len() {
        return Err(LagcorrError::InsufficientOverlap { rows });
    }
    if is_constant(xs) || is_constant(ys) {
        return Err(LagcorrError::DegenerateVariance);
    }

    #[allow(clippy::cast_precision_loss)]
    let n = rows as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return Err(LagcorrError::DegenerateVariance);
    }
    Ok((cov / denom).clamp(-1.0, 1.0))
}

/// Pearson correlation of the two value columns of aligned rows.
///
/// # Errors
/// See [`pearson`].
pub fn correlate_rows(rows: &[AlignedRow]) -> Result<f64, LagcorrError> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = rows.iter().map(|r| (r.a, r.b)).unzip();
    pearson(&xs, &ys)
}

/// Round to four decimals, ties to even, on the exact binary value.
///
/// Non-finite input is returned unchanged.
///
/// ```
/// use lagcorr_core::timeseries::stats::round4;
///
/// assert_eq!(round4(0.123_456), 0.1235);
/// assert_eq!(round4(-0.999_96), -1.0);
/// ```
#[must_use]
pub fn round4(x: f64) -> f64 {
    Decimal::from_f64_retain(x)
        .map(|d| d.round_dp_with_strategy(4, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .unwrap_or(x)
}

fn is_constant(xs: &[f64]) -> bool {
    let (min, max) = xs
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    min == max
}
