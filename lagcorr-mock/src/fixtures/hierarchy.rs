use super::trends::{BOILER, METER, RADIATOR};

/// Parent asset grouping the heating circuit.
pub const PLANT: i64 = 10;
/// Parent asset without children.
pub const EMPTY_PARENT: i64 = 11;

pub fn children_of(asset_id: i64) -> Option<Vec<i64>> {
    match asset_id {
        PLANT => Some(vec![BOILER, RADIATOR, METER]),
        EMPTY_PARENT => Some(Vec::new()),
        _ => None,
    }
}
