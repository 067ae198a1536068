use chrono::offset::LocalResult;
use chrono::{DateTime, Days, Months, NaiveDateTime, Offset, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::series::{Point, dedup_keep_last};
use lagcorr_types::LagUnit;

/// Shift one timestamp by `step` units of `unit`.
///
/// Seconds, minutes and hours are elapsed durations. Days, months and years
/// move the local wall clock in the timestamp's own timezone; month
/// arithmetic clamps to the last valid day. A wall-clock result that falls
/// into a DST overlap resolves to the earlier instant, and one that falls
/// into a DST gap keeps the original UTC offset.
///
/// Returns `None` when the result is out of range.
#[must_use]
pub fn shift_timestamp(ts: DateTime<Tz>, unit: LagUnit, step: i64) -> Option<DateTime<Tz>> {
    match unit {
        LagUnit::Seconds => ts.checked_add_signed(TimeDelta::try_seconds(step)?),
        LagUnit::Minutes => ts.checked_add_signed(TimeDelta::try_minutes(step)?),
        LagUnit::Hours => ts.checked_add_signed(TimeDelta::try_hours(step)?),
        LagUnit::Days => {
            let days = Days::new(step.unsigned_abs());
            let naive = if step >= 0 {
                ts.naive_local().checked_add_days(days)?
            } else {
                ts.naive_local().checked_sub_days(days)?
            };
            relocalize(ts, naive)
        }
        LagUnit::Months => shift_months(ts, step),
        LagUnit::Years => shift_months(ts, step.checked_mul(12)?),
    }
}

/// Shift every sample of a sorted series, keeping the later sample when two
/// shifted timestamps collide. Samples whose shift overflows are dropped.
#[must_use]
pub fn shift_points(points: &[Point], unit: LagUnit, step: i64) -> Vec<Point> {
    if step == 0 {
        return points.to_vec();
    }
    let mut shifted: Vec<Point> = points
        .iter()
        .filter_map(|&(ts, v)| shift_timestamp(ts, unit, step).map(|t| (t, v)))
        .collect();
    // Relocalizing around DST can reorder neighbours by a few minutes.
    shifted.sort_by_key(|(ts, _)| *ts);
    dedup_keep_last(shifted)
}

fn shift_months(ts: DateTime<Tz>, months: i64) -> Option<DateTime<Tz>> {
    let m = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    let naive = if months >= 0 {
        ts.naive_local().checked_add_months(m)?
    } else {
        ts.naive_local().checked_sub_months(m)?
    };
    relocalize(ts, naive)
}

fn relocalize(original: DateTime<Tz>, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    let tz = original.timezone();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let offset = TimeDelta::try_seconds(i64::from(original.offset().fix().local_minus_utc()))?;
            let utc = naive.checked_sub_signed(offset)?;
            Some(tz.from_utc_datetime(&utc))
        }
    }
}
