//! Authored hazard layout
//!
//! Hand-placed zones along the opening stretch of the level, as
//! `(start_x, width, magnitude)`. Overhangs and ceiling recesses carry a
//! clearance, floor recesses a downward offset. Past the last entry the
//! channel is left at its base clearance.

use super::zone::HazardZone;

/// `(start_x, width, magnitude)`
pub type AuthoredZone = (f64, f64, f64);

pub const OVERHANGS: &[AuthoredZone] = &[
    (780.0, 60.0, 160.0),
    (860.0, 40.0, 150.0),
    (1140.0, 70.0, 180.0),
    (1240.0, 50.0, 160.0),
    (1430.0, 60.0, 160.0),
    (1560.0, 40.0, 150.0),
    (1710.0, 60.0, 140.0),
    (2000.0, 60.0, 140.0),
    (2150.0, 80.0, 180.0),
    (2320.0, 60.0, 150.0),
    (2520.0, 70.0, 150.0),
    (2660.0, 60.0, 160.0),
    (2840.0, 70.0, 150.0),
    (3000.0, 60.0, 160.0),
    (3140.0, 60.0, 150.0),
    (3290.0, 80.0, 140.0),
    (3460.0, 60.0, 150.0),
    (3620.0, 60.0, 140.0),
    (3780.0, 70.0, 150.0),
    (3940.0, 60.0, 140.0),
    (4100.0, 70.0, 150.0),
    (4300.0, 70.0, 150.0),
    (4460.0, 60.0, 140.0),
    (4660.0, 80.0, 140.0),
    (4820.0, 60.0, 150.0),
    (4980.0, 70.0, 140.0),
    (5160.0, 60.0, 150.0),
    (5340.0, 70.0, 140.0),
    (5520.0, 60.0, 150.0),
    (5700.0, 70.0, 140.0),
    (5880.0, 60.0, 150.0),
    (6060.0, 70.0, 140.0),
    (6240.0, 60.0, 150.0),
    (6420.0, 70.0, 140.0),
    (6600.0, 60.0, 150.0),
    (6780.0, 80.0, 140.0),
    (6960.0, 60.0, 150.0),
    (7140.0, 70.0, 140.0),
    (7320.0, 60.0, 150.0),
    (7500.0, 70.0, 140.0),
    (7680.0, 60.0, 150.0),
    (7860.0, 70.0, 140.0),
    (8040.0, 60.0, 150.0),
    (8220.0, 70.0, 140.0),
    (8400.0, 60.0, 150.0),
    (8580.0, 70.0, 140.0),
    (8760.0, 60.0, 150.0),
    (8940.0, 70.0, 140.0),
    (9120.0, 60.0, 150.0),
    (9300.0, 70.0, 140.0),
    (9480.0, 60.0, 150.0),
    (9660.0, 70.0, 140.0),
];

pub const CEILING_RECESSES: &[AuthoredZone] = &[
    (900.0, 80.0, 280.0),
    (1330.0, 80.0, 260.0),
    (1810.0, 80.0, 260.0),
    (2400.0, 60.0, 300.0),
    (2880.0, 80.0, 260.0),
    (3380.0, 80.0, 300.0),
    (3600.0, 80.0, 280.0),
    (4020.0, 80.0, 280.0),
    (4460.0, 90.0, 280.0),
    (4900.0, 90.0, 270.0),
    (5340.0, 90.0, 300.0),
    (6000.0, 80.0, 280.0),
    (6660.0, 90.0, 260.0),
    (7320.0, 80.0, 280.0),
    (7980.0, 90.0, 300.0),
    (8640.0, 80.0, 280.0),
    (9300.0, 90.0, 260.0),
    (9740.0, 90.0, 300.0),
];

pub const FLOOR_RECESSES: &[AuthoredZone] = &[
    (720.0, 140.0, 20.0),
    (1110.0, 130.0, 25.0),
    (1390.0, 100.0, 25.0),
    (1660.0, 110.0, 25.0),
    (1900.0, 80.0, 25.0),
    (2200.0, 110.0, 25.0),
    (2680.0, 110.0, 25.0),
    (2940.0, 120.0, 25.0),
    (3220.0, 130.0, 25.0),
    (3500.0, 120.0, 25.0),
    (3760.0, 110.0, 25.0),
    (4020.0, 130.0, 25.0),
    (4580.0, 120.0, 25.0),
    (4860.0, 130.0, 30.0),
    (5140.0, 120.0, 25.0),
    (5420.0, 130.0, 30.0),
    (5700.0, 120.0, 25.0),
    (5980.0, 140.0, 30.0),
    (6260.0, 130.0, 25.0),
    (6540.0, 140.0, 30.0),
    (6820.0, 120.0, 25.0),
    (7100.0, 140.0, 30.0),
    (7380.0, 120.0, 25.0),
    (7660.0, 140.0, 30.0),
    (7940.0, 120.0, 25.0),
    (8220.0, 140.0, 30.0),
    (8500.0, 120.0, 25.0),
    (8780.0, 140.0, 30.0),
    (9060.0, 120.0, 25.0),
    (9340.0, 140.0, 30.0),
    (9620.0, 120.0, 25.0),
];
/// Every authored zone, in table order
pub fn authored_zones() -> impl Iterator<Item = HazardZone> {
    let overhangs = OVERHANGS
        .iter()
        .map(|&(start, width, clearance)| HazardZone::overhang(start, width, clearance));
    let recesses = CEILING_RECESSES
        .iter()
        .map(|&(start, width, clearance)| HazardZone::recess(start, width, clearance));
    let floor = FLOOR_RECESSES
        .iter()
        .map(|&(start, width, offset)| HazardZone::floor_offset(start, width, offset));
    overhangs.chain(recesses).chain(floor)
}
