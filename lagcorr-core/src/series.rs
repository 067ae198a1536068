//! Series model shared by every stage of the engine.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, FixedOffset, TimeDelta};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::timeseries::infer::infer_frequency;
use lagcorr_types::SeriesSummary;

/// One timestamped `(instant, value)` sample of a normalized series.
pub type Point = (DateTime<Tz>, f64);

/// One record of a raw attribute feed, as produced by a trend source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Timestamp with the offset the source reported it in.
    pub ts: DateTime<FixedOffset>,
    /// Attribute values; `None` marks an explicit null.
    pub fields: BTreeMap<String, Option<f64>>,
}

impl RawSample {
    /// Build a sample from `(name, value)` pairs.
    pub fn new<I, K>(ts: DateTime<FixedOffset>, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<f64>)>,
        K: Into<String>,
    {
        Self {
            ts,
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Calendar unit of an inferred sampling interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrequencyUnit {
    /// One second.
    Second,
    /// One minute.
    Minute,
    /// One hour.
    Hour,
    /// One day.
    Day,
    /// One calendar month; has no fixed duration.
    Month,
}

impl FrequencyUnit {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Second => "s",
            Self::Minute => "min",
            Self::Hour => "h",
            Self::Day => "d",
            Self::Month => "mo",
        }
    }

    const fn seconds(self) -> Option<i64> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(60),
            Self::Hour => Some(3_600),
            Self::Day => Some(86_400),
            Self::Month => None,
        }
    }
}

/// Dominant sampling interval of a series, decoded once at inference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    /// Exactly one unit, e.g. hourly.
    Unit(FrequencyUnit),
    /// `count` units with `count >= 2`, e.g. 15 minutes.
    Multiple {
        /// Base unit.
        unit: FrequencyUnit,
        /// Number of units per interval.
        count: u32,
    },
}

impl Frequency {
    /// Build a frequency, folding a count of one into [`Frequency::Unit`].
    ///
    /// Returns `None` for a zero count.
    #[must_use]
    pub const fn new(unit: FrequencyUnit, count: u32) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(Self::Unit(unit)),
            count => Some(Self::Multiple { unit, count }),
        }
    }

    /// Base unit.
    #[must_use]
    pub const fn unit(self) -> FrequencyUnit {
        match self {
            Self::Unit(unit) | Self::Multiple { unit, .. } => unit,
        }
    }

    /// Units per interval.
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            Self::Unit(_) => 1,
            Self::Multiple { count, .. } => count,
        }
    }

    /// Fixed duration of the interval, used as merge tolerance.
    ///
    /// Calendar-month intervals have no fixed duration and return `None`.
    #[must_use]
    pub fn tolerance(self) -> Option<TimeDelta> {
        let secs = self.unit().seconds()?.checked_mul(i64::from(self.count()))?;
        TimeDelta::try_seconds(secs)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count(), self.unit().suffix())
    }
}

/// Row of two series aligned on a common timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedRow {
    /// Timestamp of the driving series (or grid point).
    pub ts: DateTime<Tz>,
    /// Value of the first series.
    pub a: f64,
    /// Value of the second series.
    pub b: f64,
}

/// Deduplicated, null-free, time-sorted single-attribute series.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    label: String,
    samples: Vec<Point>,
    frequency: Option<Frequency>,
}

impl NormalizedSeries {
    /// Build a series from samples in any order.
    ///
    /// Non-finite values are dropped, samples are sorted by instant, repeated
    /// instants keep the later-seen value, and the frequency is inferred.
    pub fn from_samples<I>(label: impl Into<String>, samples: I) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let mut samples: Vec<Point> = samples.into_iter().filter(|(_, v)| v.is_finite()).collect();
        // Stable sort keeps arrival order among equal instants.
        samples.sort_by_key(|(ts, _)| *ts);
        let samples = dedup_keep_last(samples);
        let frequency = {
            let ts: Vec<DateTime<Tz>> = samples.iter().map(|(ts, _)| *ts).collect();
            infer_frequency(&ts)
        };
        Self {
            label: label.into(),
            samples,
            frequency,
        }
    }

    /// Series label, `{asset_id}_{attribute}`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Samples in strictly increasing time order.
    #[must_use]
    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    /// Inferred sampling interval.
    #[must_use]
    pub const fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the series holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First timestamp; `None` iff empty.
    #[must_use]
    pub fn start(&self) -> Option<DateTime<Tz>> {
        self.samples.first().map(|(ts, _)| *ts)
    }

    /// Last timestamp; `None` iff empty.
    #[must_use]
    pub fn end(&self) -> Option<DateTime<Tz>> {
        self.samples.last().map(|(ts, _)| *ts)
    }

    /// Whether a correlation involving only this series is undefined:
    /// fewer than two samples or a constant value.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        match self.samples.first() {
            None => true,
            Some(&(_, first)) => self.samples.len() < 2 || self.samples.iter().all(|&(_, v)| v == first),
        }
    }

    /// First difference of the series; the first sample is dropped.
    #[must_use]
    pub fn differenced(&self) -> Self {
        let diffs = self
            .samples
            .windows(2)
            .map(|w| (w[1].0, w[1].1 - w[0].1));
        Self::from_samples(self.label.clone(), diffs)
    }

    /// Reporting summary of the series.
    #[must_use]
    pub fn summary(&self) -> SeriesSummary {
        SeriesSummary {
            label: self.label.clone(),
            frequency: self.frequency.map(|f| f.to_string()),
            data_size: self.samples.len(),
            start_date: self.start().map(|ts| ts.fixed_offset()),
            end_date: self.end().map(|ts| ts.fixed_offset()),
        }
    }
}

/// Collapse runs of equal instants in a sorted vector, keeping the last of each run.
pub(crate) fn dedup_keep_last(sorted: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(sorted.len());
    for p in sorted {
        match out.last_mut() {
            Some(last) if last.0 == p.0 => *last = p,
            _ => out.push(p),
        }
    }
    out
}
