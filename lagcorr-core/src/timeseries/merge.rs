use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;

use crate::series::{AlignedRow, Frequency, Point};

/// Which side of a pair drives a nearest-time merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    /// The first series keeps its timestamps.
    First,
    /// The second series keeps its timestamps.
    Second,
}

/// Driver and tolerance for aligning one pair of series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePlan {
    /// Series whose timestamps survive the merge.
    pub driver: Driver,
    /// Largest accepted distance to the matched sample; `None` is unbounded.
    pub tolerance: Option<TimeDelta>,
}

impl MergePlan {
    /// Choose driver and tolerance from the two series' frequencies.
    ///
    /// When both intervals have a fixed duration, the higher-frequency series
    /// drives and its interval is the tolerance; the second series drives on a
    /// tie. Otherwise the first series drives and matching is unbounded.
    #[must_use]
    pub fn for_pair(first: Option<Frequency>, second: Option<Frequency>) -> Self {
        match (
            first.and_then(Frequency::tolerance),
            second.and_then(Frequency::tolerance),
        ) {
            (Some(a), Some(b)) if a < b => Self {
                driver: Driver::First,
                tolerance: Some(a),
            },
            (Some(_), Some(b)) => Self {
                driver: Driver::Second,
                tolerance: Some(b),
            },
            _ => Self {
                driver: Driver::First,
                tolerance: None,
            },
        }
    }

    /// Align `first` and `second` according to the plan.
    ///
    /// Rows always carry the first series' value in `a` regardless of which
    /// side drives.
    #[must_use]
    pub fn align(&self, first: &[Point], second: &[Point]) -> Vec<AlignedRow> {
        match self.driver {
            Driver::First => merge_nearest(first, second, self.tolerance)
                .into_iter()
                .map(|(ts, a, b)| AlignedRow { ts, a, b })
                .collect(),
            Driver::Second => merge_nearest(second, first, self.tolerance)
                .into_iter()
                .map(|(ts, b, a)| AlignedRow { ts, a, b })
                .collect(),
        }
    }
}

/// Inner nearest-time join of `other` onto the timestamps of `driver`.
///
/// Both inputs must be sorted by time. Each driver sample is matched with the
/// closest sample of `other`; on equal distance the earlier one wins. Samples
/// without a match inside `tolerance` are dropped. Returns
/// `(driver_ts, driver_value, other_value)` in driver order.
#[must_use]
pub fn merge_nearest(
    driver: &[Point],
    other: &[Point],
    tolerance: Option<TimeDelta>,
) -> Vec<(DateTime<Tz>, f64, f64)> {
    let mut out = Vec::with_capacity(driver.len().min(other.len()));
    if other.is_empty() {
        return out;
    }
    // Index of the first `other` sample strictly after the current driver time.
    let mut next = 0usize;
    for &(ts, value) in driver {
        while next < other.len() && other[next].0 <= ts {
            next += 1;
        }
        let before = next.checked_sub(1).map(|i| other[i]);
        let after = other.get(next).copied();
        let nearest = match (before, after) {
            (Some(b), Some(a)) => {
                if a.0 - ts < ts - b.0 {
                    a
                } else {
                    b
                }
            }
            (Some(p), None) | (None, Some(p)) => p,
            (None, None) => continue,
        };
        let distance = (nearest.0 - ts).abs();
        if tolerance.is_none_or(|tol| distance <= tol) {
            out.push((ts, value, nearest.1));
        }
    }
    out
}
