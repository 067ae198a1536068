use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone};
use lagcorr_core::RawSample;

/// Hourly boiler with temperature and flow.
pub const BOILER: i64 = 1;
/// Radiator whose temperature follows the boiler one hour later.
pub const RADIATOR: i64 = 2;
/// Quarter-hourly power meter delivered in overlapping chunks.
pub const METER: i64 = 3;
/// Monthly consumption over 2023.
pub const MONTHLY: i64 = 4;

const HOURS: i64 = 48;

fn cet() -> FixedOffset {
    FixedOffset::east_opt(3_600).unwrap()
}

fn start() -> DateTime<FixedOffset> {
    cet().with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Deterministic, non-monotone temperature profile.
fn temp(i: i64) -> f64 {
    let base = [52.0, 55.5, 61.0, 58.0, 64.5, 60.0, 57.5, 66.0, 63.0, 59.5, 68.0, 62.5];
    base[(i.rem_euclid(12)) as usize] + (i / 12) as f64 * 0.5
}

pub fn by_asset(asset_id: i64) -> Option<Vec<RawSample>> {
    match asset_id {
        BOILER => Some(
            (0..HOURS)
                .map(|i| {
                    RawSample::new(
                        start() + TimeDelta::hours(i),
                        [
                            ("temp", Some(temp(i))),
                            ("flow", Some(((i * 7) % 11) as f64 + 1.0)),
                        ],
                    )
                })
                .collect(),
        ),
        RADIATOR => Some(
            (0..HOURS)
                .map(|i| {
                    RawSample::new(
                        start() + TimeDelta::hours(i + 1),
                        [("temp", Some(temp(i) - 12.0))],
                    )
                })
                .collect(),
        ),
        METER => Some(meter()),
        MONTHLY => Some(
            (1..=12)
                .map(|m| {
                    let ts = cet().with_ymd_and_hms(2023, m, 1, 0, 0, 0).unwrap();
                    RawSample::new(ts, [("consumption", Some(f64::from(m * 37 % 13) + 100.0))])
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Two chunks overlapping by one hour; the second chunk restates the overlap
/// with corrected values and one explicit null.
fn meter() -> Vec<RawSample> {
    let at = |q: i64| start() + TimeDelta::minutes(15 * q);
    let first = (0..=16).map(|q| RawSample::new(at(q), [("power", Some(10.0 + (q % 5) as f64))]));
    let second = (12..=48).map(|q| {
        let v = if q == 20 { None } else { Some(20.0 + (q % 7) as f64) };
        RawSample::new(at(q), [("power", v)])
    });
    first.chain(second).collect()
}
