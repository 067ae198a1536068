use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::series::{NormalizedSeries, RawSample};
use lagcorr_types::{AssetSelection, LagcorrError};

/// Raw feed with rows collapsed by instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollapsedFeed {
    /// Union of field names in first-seen order.
    pub columns: Vec<String>,
    /// Fields per instant; a later sample overwrote earlier values field by field.
    pub rows: BTreeMap<DateTime<Utc>, BTreeMap<String, Option<f64>>>,
}

impl CollapsedFeed {
    /// Whether any row carried `name`.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Non-null finite values of one column converted to `tz`, in time order.
    pub fn column<'a>(
        &'a self,
        name: &'a str,
        tz: Tz,
    ) -> impl Iterator<Item = (DateTime<Tz>, f64)> + 'a {
        self.rows.iter().filter_map(move |(ts, fields)| {
            fields
                .get(name)
                .copied()
                .flatten()
                .filter(|v| v.is_finite())
                .map(|v| (ts.with_timezone(&tz), v))
        })
    }
}

/// Collapse raw samples that share an instant.
///
/// Samples are applied in arrival order, so for every field the later sample
/// wins, including an explicit null.
#[must_use]
pub fn collapse_rows(raw: Vec<RawSample>) -> CollapsedFeed {
    let mut feed = CollapsedFeed::default();
    let mut seen: HashSet<String> = HashSet::new();
    for sample in raw {
        for name in sample.fields.keys() {
            if seen.insert(name.clone()) {
                feed.columns.push(name.clone());
            }
        }
        feed.rows
            .entry(sample.ts.with_timezone(&Utc))
            .or_default()
            .extend(sample.fields);
    }
    feed
}

/// Series extracted from one asset's feed plus non-fatal problems.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFeed {
    /// One series per requested attribute.
    pub series: Vec<NormalizedSeries>,
    /// Warnings such as missing attributes.
    pub warnings: Vec<LagcorrError>,
}

/// Turn one asset's raw feed into normalized series.
///
/// A selection naming an attribute yields at most that one series; a missing
/// attribute becomes a `DataGap` warning. A selection without an attribute
/// yields one series per column. Timestamps are converted to `tz` and the
/// selection's `diff` flag is applied before frequency inference.
#[must_use]
pub fn normalize_feed(selection: &AssetSelection, raw: Vec<RawSample>, tz: Tz) -> NormalizedFeed {
    let feed = collapse_rows(raw);
    let mut out = NormalizedFeed::default();

    let columns: Vec<&str> = match selection.attribute_name.as_deref() {
        Some(name) if feed.has_column(name) => vec![name],
        Some(name) => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                asset_id = selection.asset_id,
                attribute = name,
                "attribute missing from feed; skipping"
            );
            out.warnings
                .push(LagcorrError::data_gap(selection.asset_id, name));
            return out;
        }
        None => feed.columns.iter().map(String::as_str).collect(),
    };

    for name in columns {
        let series = NormalizedSeries::from_samples(
            series_label(selection.asset_id, name),
            feed.column(name, tz),
        );
        out.series.push(if selection.diff {
            series.differenced()
        } else {
            series
        });
    }
    out
}

/// Label of the series holding `attribute` of `asset_id`.
#[must_use]
pub fn series_label(asset_id: i64, attribute: &str) -> String {
    format!("{asset_id}_{attribute}")
}
