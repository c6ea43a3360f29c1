//! Golden-spiral mapping from sequence position to unit-cube coordinates.

use constants::alphabet::base_index;
use constants::layout::{BASE_OFFSET_STEP, GOLDEN_ANGLE, RADIUS_SCALE, Z_DRIFT_SCALE};

/// Point in the unit cube, every component in [0, 1)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Vedic digital root, a period-9 cluster label in 1..=9.
///
/// `digital_root(0)` is 9 so that every position lands in a cluster.
pub fn digital_root(n: u64) -> u64 {
    if n == 0 {
        return 9;
    }
    1 + (n - 1) % 9
}

/// Map a symbol at a sequence position onto the golden spiral.
///
/// x/y follow a Fermat spiral (radius ∝ √position, golden-angle increments)
/// nudged by the symbol's alphabet class. z combines the digital-root decile
/// with a slow drift along absolute position.
pub fn map_position(symbol: u8, position: u64) -> Coordinate {
    let root = digital_root(position);
    let position = position as f64;

    let theta = position * GOLDEN_ANGLE;
    let radius = position.sqrt() / RADIUS_SCALE;
    let base_offset = f64::from(base_index(symbol)) * BASE_OFFSET_STEP;

    Coordinate {
        x: wrap_unit(radius * theta.cos() + base_offset),
        y: wrap_unit(radius * theta.sin() + base_offset),
        z: wrap_unit(root as f64 / 10.0 + position / Z_DRIFT_SCALE),
    }
}

/// Wrap a value into [0, 1).
fn wrap_unit(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid of a tiny negative rounds up to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}
