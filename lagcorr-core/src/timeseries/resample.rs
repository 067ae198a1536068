use chrono::offset::LocalResult;
use chrono::{DateTime, Datelike, Days, NaiveDate, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::series::{AlignedRow, Frequency, Point};

const DAY: i64 = 86_400;

/// Uniform grid a pair of series is resampled onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grid {
    /// Fixed sub-day step anchored at the Unix epoch.
    Seconds(i64),
    /// Whole local calendar days, counted from `0001-01-01`.
    Days(i64),
}

impl Grid {
    /// Grid at the coarser of two resolved intervals, or the only resolved one.
    ///
    /// Returns `None` when neither interval has a fixed duration.
    #[must_use]
    pub fn for_pair(first: Option<Frequency>, second: Option<Frequency>) -> Option<Self> {
        let step = match (
            first.and_then(Frequency::tolerance),
            second.and_then(Frequency::tolerance),
        ) {
            (Some(a), Some(b)) => a.max(b),
            (Some(x), None) | (None, Some(x)) => x,
            (None, None) => return None,
        };
        Self::from_step(step)
    }

    /// Grid for a fixed step; whole-day steps follow the local calendar.
    #[must_use]
    pub fn from_step(step: TimeDelta) -> Option<Self> {
        let secs = step.num_seconds();
        if secs <= 0 {
            return None;
        }
        Some(if secs % DAY == 0 {
            Self::Days(secs / DAY)
        } else {
            Self::Seconds(secs)
        })
    }

    /// Grid point containing `ts`.
    #[must_use]
    pub fn bucket_of(self, ts: DateTime<Tz>) -> Option<DateTime<Tz>> {
        let tz = ts.timezone();
        match self {
            Self::Seconds(step) => {
                let secs = ts.timestamp();
                let bucket = secs - secs.rem_euclid(step);
                DateTime::from_timestamp(bucket, 0).map(|utc| utc.with_timezone(&tz))
            }
            Self::Days(n) => {
                let date = ts.date_naive();
                let day = i64::from(date.num_days_from_ce());
                let floored = day - day.rem_euclid(n);
                let date = NaiveDate::from_num_days_from_ce_opt(i32::try_from(floored).ok()?)?;
                local_midnight(date, tz)
            }
        }
    }

    /// Grid point following `bucket`.
    #[must_use]
    pub fn next(self, bucket: DateTime<Tz>) -> Option<DateTime<Tz>> {
        match self {
            Self::Seconds(step) => bucket.checked_add_signed(TimeDelta::try_seconds(step)?),
            Self::Days(n) => {
                let date = bucket
                    .date_naive()
                    .checked_add_days(Days::new(u64::try_from(n).ok()?))?;
                local_midnight(date, bucket.timezone())
            }
        }
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> Option<DateTime<Tz>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt1, _) => Some(dt1),
        // Midnight skipped by a DST jump: take the first instant of the day.
        LocalResult::None => (1..=3)
            .filter_map(|h| date.and_hms_opt(h, 0, 0))
            .find_map(|t| tz.from_local_datetime(&t).earliest()),
    }
}

/// Mean of the samples in each grid bucket, keyed by bucket start.
///
/// Input must be sorted by time; output is sorted and has one point per
/// non-empty bucket.
#[must_use]
pub fn resample_mean(points: &[Point], grid: Grid) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::new();
    let mut cur: Option<(DateTime<Tz>, f64, u32)> = None;
    for &(ts, v) in points {
        let Some(bucket) = grid.bucket_of(ts) else {
            continue;
        };
        match cur.as_mut() {
            Some((b, sum, n)) if *b == bucket => {
                *sum += v;
                *n += 1;
            }
            _ => {
                if let Some((b, sum, n)) = cur.take() {
                    out.push((b, sum / f64::from(n)));
                }
                cur = Some((bucket, v, 1));
            }
        }
    }
    if let Some((b, sum, n)) = cur {
        out.push((b, sum / f64::from(n)));
    }
    out
}

/// Resample both series onto `grid`, forward-fill each over the overlap of
/// their bucket ranges, and join on identical grid points.
#[must_use]
pub fn align_resampled(first: &[Point], second: &[Point], grid: Grid) -> Vec<AlignedRow> {
    let ra = resample_mean(first, grid);
    let rb = resample_mean(second, grid);
    let (Some(a0), Some(b0), Some(a1), Some(b1)) = (ra.first(), rb.first(), ra.last(), rb.last())
    else {
        return Vec::new();
    };
    let from = a0.0.max(b0.0);
    let to = a1.0.min(b1.0);

    let mut rows = Vec::new();
    let (mut ia, mut ib) = (0usize, 0usize);
    let mut point = Some(from);
    while let Some(g) = point.filter(|g| *g <= to) {
        while ia + 1 < ra.len() && ra[ia + 1].0 <= g {
            ia += 1;
        }
        while ib + 1 < rb.len() && rb[ib + 1].0 <= g {
            ib += 1;
        }
        rows.push(AlignedRow {
            ts: g,
            a: ra[ia].1,
            b: rb[ib].1,
        });
        point = grid.next(g);
    }
    rows
}
