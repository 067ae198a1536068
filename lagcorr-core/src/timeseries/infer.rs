use chrono::{DateTime, Datelike, Months, NaiveDateTime, TimeDelta};
use chrono_tz::Tz;

use crate::series::{Frequency, FrequencyUnit};

/// Minimum number of samples before a regular structure is trusted.
const STRUCTURAL_MIN: usize = 4;

/// Infer the dominant sampling interval of sorted timestamps.
///
/// With at least four samples a regular structure is tried first on local
/// wall-clock time: identical wall-clock deltas, or a constant stride of whole
/// calendar months. Otherwise the most frequent absolute delta is decoded;
/// ties resolve to the smallest delta.
///
/// Returns `None` for fewer than two distinct timestamps or when the
/// dominant delta is not a whole number of seconds.
///
/// ```
/// use chrono::TimeZone;
/// use lagcorr_core::timeseries::infer::infer_frequency;
/// use lagcorr_core::{Frequency, FrequencyUnit};
///
/// let tz = chrono_tz::UTC;
/// let ts: Vec<_> = (0..3)
///     .map(|i| tz.with_ymd_and_hms(2024, 1, 1, i * 2, 0, 0).unwrap())
///     .collect();
/// assert_eq!(
///     infer_frequency(&ts),
///     Frequency::new(FrequencyUnit::Hour, 2)
/// );
/// ```
#[must_use]
pub fn infer_frequency(ts: &[DateTime<Tz>]) -> Option<Frequency> {
    if ts.len() < 2 {
        return None;
    }
    if ts.len() >= STRUCTURAL_MIN
        && let Some(freq) = structural(ts)
    {
        return Some(freq);
    }
    estimate_step(ts).and_then(decode_delta)
}

/// Most frequent positive delta between adjacent timestamps.
///
/// Ties resolve to the smallest delta so the reported cadence is one that was
/// actually observed. Duplicate timestamps are ignored.
#[must_use]
pub fn estimate_step(ts: &[DateTime<Tz>]) -> Option<TimeDelta> {
    let mut deltas: Vec<TimeDelta> = ts
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|d| *d > TimeDelta::zero())
        .collect();
    if deltas.is_empty() {
        return None;
    }
    deltas.sort_unstable();

    let mut best_delta = deltas[0];
    let mut best_count: usize = 0;
    let mut cur_delta = deltas[0];
    let mut cur_count: usize = 0;
    for &d in &deltas {
        if d == cur_delta {
            cur_count += 1;
            continue;
        }
        // Strictly greater keeps the smaller delta on ties.
        if cur_count > best_count {
            best_count = cur_count;
            best_delta = cur_delta;
        }
        cur_delta = d;
        cur_count = 1;
    }
    if cur_count > best_count {
        best_delta = cur_delta;
    }
    Some(best_delta)
}

/// Decode a fixed delta into the largest unit that divides it evenly.
#[must_use]
pub fn decode_delta(delta: TimeDelta) -> Option<Frequency> {
    if delta <= TimeDelta::zero() || delta.subsec_nanos() != 0 {
        return None;
    }
    let secs = delta.num_seconds();
    let (unit, per) = [
        (FrequencyUnit::Day, 86_400),
        (FrequencyUnit::Hour, 3_600),
        (FrequencyUnit::Minute, 60),
        (FrequencyUnit::Second, 1),
    ]
    .into_iter()
    .find(|(_, per)| secs % per == 0)?;
    Frequency::new(unit, u32::try_from(secs / per).ok()?)
}

fn structural(ts: &[DateTime<Tz>]) -> Option<Frequency> {
    let local: Vec<NaiveDateTime> = ts.iter().map(DateTime::naive_local).collect();

    let first = local[1] - local[0];
    if local.windows(2).all(|w| w[1] - w[0] == first)
        && let Some(freq) = decode_delta(first)
    {
        return Some(freq);
    }

    let stride = month_stride(local[0], local[1])?;
    local
        .windows(2)
        .all(|w| month_stride(w[0], w[1]) == Some(stride))
        .then(|| Frequency::new(FrequencyUnit::Month, stride))
        .flatten()
}

/// Whole calendar months from `a` to `b`, if `b` is exactly that many months later.
///
/// Month-end anchored pairs (both on the last day of their month at the same
/// time of day) also count, so `Jan 31 -> Feb 29 -> Mar 31` is monthly.
fn month_stride(a: NaiveDateTime, b: NaiveDateTime) -> Option<u32> {
    let months = (b.year() - a.year()) * 12 + b.month() as i32 - a.month() as i32;
    let months = u32::try_from(months).ok().filter(|m| *m > 0)?;
    if a.checked_add_months(Months::new(months)) == Some(b) {
        return Some(months);
    }
    (is_month_end(a) && is_month_end(b) && a.time() == b.time()).then_some(months)
}

fn is_month_end(t: NaiveDateTime) -> bool {
    t.date().succ_opt().is_some_and(|next| next.month() != t.month())
}
