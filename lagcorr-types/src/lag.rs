//! Calendar lag units and sweep windows.

use std::fmt;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::LagcorrError;

/// Calendar unit in which a lag step is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagUnit {
    /// Elapsed seconds.
    Seconds,
    /// Elapsed minutes.
    Minutes,
    /// Elapsed hours.
    Hours,
    /// Calendar days in the reference timezone.
    Days,
    /// Calendar months in the reference timezone.
    Months,
    /// Calendar years in the reference timezone.
    Years,
}

impl LagUnit {
    /// All units in ascending order of magnitude.
    pub const ALL: [Self; 6] = [
        Self::Seconds,
        Self::Minutes,
        Self::Hours,
        Self::Days,
        Self::Months,
        Self::Years,
    ];

    /// Wire name of the unit.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "seconds",
            Self::Minutes => "minutes",
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    /// Whether a step of this unit follows the calendar rather than elapsed time.
    #[must_use]
    pub const fn is_calendar(self) -> bool {
        matches!(self, Self::Days | Self::Months | Self::Years)
    }
}

impl fmt::Display for LagUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LagUnit {
    type Err = LagcorrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|u| u.as_str() == s)
            .ok_or_else(|| LagcorrError::config(format!("unknown lag unit '{s}'")))
    }
}

/// One symmetric sweep window `[-magnitude, +magnitude]` in steps of `unit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LagSpec {
    /// Unit of every step in the window.
    pub unit: LagUnit,
    /// Largest absolute step.
    pub magnitude: u32,
}

impl LagSpec {
    /// Construct a window.
    #[must_use]
    pub const fn new(unit: LagUnit, magnitude: u32) -> Self {
        Self { unit, magnitude }
    }

    /// Signed steps of the window in sweep order (`-magnitude..=magnitude`).
    #[must_use]
    pub fn steps(&self) -> std::ops::RangeInclusive<i64> {
        let m = i64::from(self.magnitude);
        -m..=m
    }

    /// Number of steps evaluated by this window.
    #[must_use]
    pub const fn len(&self) -> usize {
        2 * self.magnitude as usize + 1
    }

    /// A window always contains at least the zero step.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// Serde adapter for the wire shape of a window list.
///
/// On the wire a list of windows is a sequence of maps, e.g.
/// `[{"hours": 2}, {"days": 1, "minutes": 5}]`. Every map entry is an
/// independent window and document order is preserved. `null` decodes as an
/// empty list.
pub mod windows {
    use super::{
        Deserialize, Deserializer, LagSpec, LagUnit, MapAccess, Serialize, SerializeMap,
        Serializer, Visitor, fmt,
    };

    struct WindowMap(Vec<LagSpec>);

    impl<'de> Deserialize<'de> for WindowMap {
        fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
            struct MapVisitor;

            impl<'de> Visitor<'de> for MapVisitor {
                type Value = WindowMap;

                fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str("a map of lag unit to non-negative magnitude")
                }

                fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<WindowMap, A::Error> {
                    let mut out = Vec::new();
                    while let Some((unit, magnitude)) = map.next_entry::<LagUnit, u32>()? {
                        out.push(LagSpec { unit, magnitude });
                    }
                    Ok(WindowMap(out))
                }
            }

            d.deserialize_map(MapVisitor)
        }
    }

    struct Single<'a>(&'a LagSpec);

    impl Serialize for Single<'_> {
        fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            let mut map = s.serialize_map(Some(1))?;
            map.serialize_entry(&self.0.unit, &self.0.magnitude)?;
            map.end()
        }
    }

    /// Serialize windows as a sequence of single-entry maps.
    ///
    /// # Errors
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(specs: &[LagSpec], s: S) -> Result<S::Ok, S::Error> {
        s.collect_seq(specs.iter().map(Single))
    }

    /// Deserialize windows from a sequence of maps (or `null`).
    ///
    /// # Errors
    /// Fails on unknown units and negative or non-integer magnitudes.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<LagSpec>, D::Error> {
        let maps: Option<Vec<WindowMap>> = Option::deserialize(d)?;
        Ok(maps
            .unwrap_or_default()
            .into_iter()
            .flat_map(|m| m.0)
            .collect())
    }
}
